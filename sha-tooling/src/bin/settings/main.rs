use anyhow::Result;

use sha_core::{Implementation, SETTINGS};

fn main() -> Result<()> {
    fil_logger::init();

    println!("{:#?}", *SETTINGS);
    println!("{:#?}", Implementation::detect());
    Ok(())
}
