use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(name = "folio-report", version, about = "Client portfolio report generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the four-page client report
    Generate(cmd::generate::GenerateCommand),
    /// Show the figures read from a workbook without rendering
    Inspect(cmd::inspect::InspectCommand),
    /// Print the expected workbook layout
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(generate) => generate.exec(),
        Command::Inspect(inspect) => inspect.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
