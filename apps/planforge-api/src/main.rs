use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = planforge_api::Args::parse();
	planforge_api::run(args).await
}
