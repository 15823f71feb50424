use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = quarry_api::Args::parse();
	quarry_api::run(args).await
}
