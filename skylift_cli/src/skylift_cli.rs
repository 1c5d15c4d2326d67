// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT
use clap::Parser;

#[derive(Debug, clap::Subcommand)]
enum FunctionCommands {
    /// Declare the functions in the spec file and render the
    /// provisioning plan.
    Plan {
        spec_file: String,
        #[arg(short, long, default_value_t = String::from(""))]
        output: String,
    },
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    Function {
        #[command(subcommand)]
        function_command: FunctionCommands,
    },
}

#[derive(Debug, clap::Parser)]
#[command(long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(short, long, default_value_t = String::from(""))]
    template: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Create a template spec file and exit.
    if !args.template.is_empty() {
        skylift_api::util::create_template(&args.template, skylift_cli::function_spec_template().as_str())?;
        return Ok(());
    }

    match args.command {
        None => log::debug!("Bye"),
        Some(Commands::Function { function_command }) => match function_command {
            FunctionCommands::Plan { spec_file, output } => {
                let spec_file: skylift_cli::function_spec::FunctionSpecFile = serde_json::from_str(
                    &std::fs::read_to_string(&spec_file).map_err(|err| anyhow::anyhow!("error reading {}: {}", spec_file, err))?,
                )?;

                let recorder = skylift_reg::recorder::PlanRecorder::new();
                let mut factory = skylift_api::function::FunctionFactory::new(Box::new(recorder.clone()));
                let resources = skylift_cli::declare_functions(spec_file, &mut factory).await?;
                log::info!("declared {} function(s)", resources.len());

                let rendered = recorder.plan().await.render()?;
                if output.is_empty() {
                    println!("{}", rendered);
                } else {
                    std::fs::write(&output, rendered)?;
                    log::info!("plan written to {}", output);
                }
            }
        },
    }
    Ok(())
}
