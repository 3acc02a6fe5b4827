use std::env::consts::ARCH;

use anyhow::Result;
use serde::Serialize;
use sha_core::{Implementation, SETTINGS};
use sysinfo::{CpuRefreshKind, RefreshKind, System, SystemExt};

/// Captures metadata about the current setup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Metadata<T> {
    package: PackageMetadata,
    engine: EngineMetadata,
    system: SystemMetadata,
    benchmarks: T,
}

impl<T> Metadata<T> {
    pub fn wrap(benchmarks: T) -> Result<Self> {
        Ok(Metadata {
            package: PackageMetadata::new(),
            engine: EngineMetadata::new(),
            system: SystemMetadata::new()?,
            benchmarks,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageMetadata {
    name: &'static str,
    version: &'static str,
}

impl PackageMetadata {
    pub fn new() -> Self {
        PackageMetadata {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// The compression implementation the benchmarks ran with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EngineMetadata {
    platform: String,
    lanes: usize,
    cache_padding: bool,
    configured_lanes: usize,
}

impl EngineMetadata {
    pub fn new() -> Self {
        let implementation = Implementation::detect();
        EngineMetadata {
            platform: format!("{:?}", implementation.platform()),
            lanes: implementation.lanes(),
            cache_padding: implementation.cache_padding(),
            configured_lanes: SETTINGS.lanes,
        }
    }
}

impl Default for EngineMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemMetadata {
    system: String,
    release: String,
    architecture: String,
    processor: String,
    processor_sse2: bool,
    processor_cores_logical: usize,
    processor_cores_physical: usize,
    memory_total_bytes: u64,
}

impl SystemMetadata {
    pub fn new() -> Result<Self> {
        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::new())
                .with_memory(),
        );

        #[cfg(target_arch = "x86_64")]
        let (processor, sse2) = {
            let cpuid = raw_cpuid::CpuId::new();
            (
                cpuid
                    .get_processor_brand_string()
                    .map(|s| s.as_str().trim().to_owned())
                    .unwrap_or_default(),
                cpuid
                    .get_feature_info()
                    .map(|info| info.has_sse2())
                    .unwrap_or_default(),
            )
        };
        #[cfg(not(target_arch = "x86_64"))]
        let (processor, sse2) = (String::from("unknown"), false);

        Ok(SystemMetadata {
            system: system.long_os_version().unwrap_or_default(),
            release: system.kernel_version().unwrap_or_default(),
            architecture: ARCH.to_string(),
            processor,
            processor_sse2: sse2,
            processor_cores_logical: num_cpus::get(),
            processor_cores_physical: num_cpus::get_physical(),
            memory_total_bytes: system.total_memory(),
        })
    }
}
