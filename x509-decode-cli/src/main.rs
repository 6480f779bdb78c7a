// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Builder;
use log::{error, info, LevelFilter};
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process,
};
use x509_decode::{
    decode_all, render_json, render_text, simplify, tlv,
};

/// Decode X.509 certificates (PEM or DER) into an inspectable form.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Noisy output.
    #[clap(long, env)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode certificates and print them.
    Decode {
        /// Input file holding certificate(s); stdin if omitted.
        #[clap(long = "in")]
        infile: Option<PathBuf>,

        /// Output format.
        #[clap(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Dump the raw ASN.1 node tree of DER input as JSON.
    Dump {
        /// Input file holding DER data; stdin if omitted.
        #[clap(long = "in")]
        infile: Option<PathBuf>,
    },
}

#[derive(Clone, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = Builder::from_default_env();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    };
    builder.filter(None, level).init();

    match args.command {
        Command::Decode { infile, format } => {
            let input = read_input(infile.as_ref())?;
            let certs = match decode_all(&input) {
                Ok(certs) => certs,
                Err(e) => {
                    error!("Error: {}", e);
                    process::exit(1);
                }
            };
            info!("decoded {} certificate(s)", certs.len());

            let simplified: Vec<_> = certs.iter().map(simplify).collect();
            match format {
                Format::Text => {
                    for cert in &simplified {
                        print!("{}", render_text(cert));
                    }
                }
                Format::Json => {
                    let json = render_json(&simplified)
                        .context("serialize certificates")?;
                    println!("{json}");
                }
            }
            Ok(())
        }
        Command::Dump { infile } => {
            let input = read_input(infile.as_ref())?;
            let decoded = tlv::decode(&input, &tlv::DecodeOptions::default());

            let nodes: Vec<_> = decoded
                .nodes
                .iter()
                .map(x509_decode::simplify::simplify_node)
                .collect();
            let json = serde_json::to_string_pretty(&nodes)
                .context("serialize node tree")?;
            println!("{json}");

            if !decoded.errors.is_empty() {
                for e in &decoded.errors {
                    error!("Error: {}", e);
                }
                process::exit(1);
            }
            Ok(())
        }
    }
}

fn read_input(infile: Option<&PathBuf>) -> Result<Vec<u8>> {
    match infile {
        Some(path) => fs::read(path)
            .with_context(|| format!("read {}", path.display())),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("read from stdin")?;
            Ok(buf)
        }
    }
}
