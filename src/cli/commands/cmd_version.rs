use clap::{Args, crate_name, crate_version};

use crate::config::Settings;

#[derive(Args, Debug)]
pub struct VersionCommand;

pub async fn execute(_: &VersionCommand, _: &Settings) {
    println!(
        "{} version: {}",
        crate_name!().to_uppercase(),
        crate_version!()
    );
}
