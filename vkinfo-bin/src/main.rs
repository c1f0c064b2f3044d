//! Vulkan capability report CLI

use std::process;

fn main() {
    env_logger::init();

    match vkinfo::gather_system() {
        Ok(snapshot) => print!("{snapshot}"),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
