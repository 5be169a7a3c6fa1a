//! redbank command-line entry point.
//!
//! ```bash
//! # Start replica 0 of a 3-replica cluster
//! redbank server 0 127.0.0.1:6000 127.0.0.1:6001 127.0.0.1:6002
//!
//! # Talk to a running replica interactively
//! redbank repl --server 127.0.0.1:6000
//!
//! # Run the scripted demonstration scenarios against a live cluster
//! redbank sim 127.0.0.1:6000 127.0.0.1:6001 127.0.0.1:6002
//! ```

mod commands;
mod style;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "redbank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs one replica of the cluster (spec §6.2).
    Server {
        /// 0-based index of this replica, parsed base 16.
        hex_index: String,

        /// One host:port per replica, in cluster order.
        #[arg(required = true, num_args = 1..)]
        addrs: Vec<String>,
    },

    /// Interactive test client against one running replica.
    Repl {
        /// Replica address to connect to.
        #[arg(short, long, default_value = "127.0.0.1:6000")]
        server: String,
    },

    /// Runs the scripted demonstration scenarios against a live cluster.
    Sim {
        /// One host:port per replica, in cluster order.
        #[arg(required = true, num_args = 1..)]
        addrs: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Server { hex_index, addrs } => commands::server::run(&hex_index, &addrs).await,
        Commands::Repl { server } => commands::repl::run(&server).await,
        Commands::Sim { addrs } => commands::sim::run(&addrs).await,
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
