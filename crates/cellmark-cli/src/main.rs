//! cellmark CLI - compile annotated markdown into reactive modules.

mod chunks;
mod colors;
mod compile;
mod local;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cellmark")]
#[command(about = "Compile annotated markdown into reactive notebook modules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a document and its imports into one module
    Compile {
        /// Path to the document (.md file)
        document: String,

        /// Directory imports and fetches are resolved against (default: the document's directory)
        #[arg(long)]
        root: Option<String>,

        /// Repository owner used for fetch-import URLs
        #[arg(long, default_value = "")]
        owner: String,

        /// Repository name used for fetch-import URLs
        #[arg(long, default_value = "")]
        repo: String,

        /// Ref used for fetch-import URLs
        #[arg(long = "ref")]
        git_ref: Option<String>,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<String>,

        /// Prefix of the generated defining functions
        #[arg(long)]
        define_prefix: Option<String>,

        /// Host used for fetch-import URLs
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Print the chunks discovered in a document as JSON
    Chunks {
        /// Path to the document (.md file)
        document: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Attach recovery hints to compiler errors
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<cellmark_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Compile {
            document,
            root,
            owner,
            repo,
            git_ref,
            output,
            config,
            define_prefix,
            base_url,
        } => {
            let options = compile::CompileOptions {
                root,
                owner,
                repo,
                git_ref,
                output,
                config,
                define_prefix,
                base_url,
            };
            compile::execute(&document, options).await.map_err(format_error)?;
        }

        Commands::Chunks { document } => {
            chunks::execute(&document).map_err(format_error)?;
        }
    }

    Ok(())
}
