use crate::backend::models::RoomId;
use crate::configuration::Configuration;
use crate::context::ApplicationContext;
use crate::error::RoomBookingError;
use crate::qr_code::RoomQrCode;
use crate::server::run_server;
use crate::utils::time_source::TimeSource;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
pub struct Commandline {
	#[clap(short = 'c', long = "config-file", default_value = "configuration.toml")]
	pub configuration_file_path: String,
	#[clap(subcommand)]
	pub command: Option<BaseCommand>,
}

#[derive(clap::Subcommand, Default)]
pub enum BaseCommand {
	/// Run the room booking server
	#[default]
	Run,
	/// Print the configuration
	Configuration,
	/// Write the QR code image leading to the booking page of a room
	QrCode {
		room_id: RoomId,
		/// Directory to write the image into
		#[clap(short, long, default_value = ".")]
		output: PathBuf,
	},
}

impl Commandline {
	pub async fn run(self) -> Result<(), RoomBookingError> {
		let configuration = Configuration::from_file(&self.configuration_file_path)?;

		tracing_subscriber::fmt()
			.with_env_filter(EnvFilter::try_new(&configuration.log_filters)?)
			.init();

		let base_command = self.command.unwrap_or_default();
		match base_command {
			BaseCommand::Run => {
				let application_context = ApplicationContext::new(configuration, TimeSource::default())?;
				info!(
					"Starting server. Open 'http://{}/' or '{}' in a browser.",
					application_context.configuration.address, application_context.configuration.public_origin
				);
				run_server(application_context).await?;
			}
			BaseCommand::Configuration => println!("{configuration:#?}"),
			BaseCommand::QrCode { room_id, output } => {
				let qr_code = RoomQrCode::generate(&configuration.public_origin, room_id)?;
				let path = output.join(&qr_code.file_name);
				tokio::fs::write(&path, &qr_code.png).await?;
				info!(target = %qr_code.target, path = %path.display(), "Wrote QR code");
			}
		}
		Ok(())
	}
}
