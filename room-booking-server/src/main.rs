use crate::commandline::Commandline;
use clap::Parser;
use std::process::ExitCode;

mod backend;
mod booking;
mod commandline;
mod configuration;
mod context;
mod dashboard;
mod error;
mod qr_code;
mod server;
mod utils;

#[tokio::main]
async fn main() -> ExitCode {
	let commandline = Commandline::parse();
	match commandline.run().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			eprintln!("{error}");
			ExitCode::FAILURE
		}
	}
}
