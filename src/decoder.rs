use std::env;
use std::fs;
use std::process;
use std::time::Instant;

use log::{error, info};

use huffpack::config::DecodeConfig;
use huffpack::files::decompress_file;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("decode", String::as_str);

    let config = match DecodeConfig::from_args(args.iter().skip(1).cloned()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("Usage: {} {}", program, DecodeConfig::USAGE);
            eprintln!("  📂 <input_file>:  path to the encoded file.");
            eprintln!("  💾 <output_file>: path to write the decoded output.");
            process::exit(1);
        }
    };

    info!("--- Start Decoding ---");
    let start_time = Instant::now();

    let restored = match decompress_file(&config.input, &config.output) {
        Ok(len) => len,
        Err(e) => {
            if e.is_corruption() {
                error!("Encoded file is corrupt or truncated: {}", e);
            } else {
                error!("Decoding failed: {}", e);
            }
            process::exit(1);
        }
    };

    info!("Decoding finished in {:.2?}.", start_time.elapsed());

    if !config.quiet {
        let input_size = fs::metadata(&config.input).map(|m| m.len()).unwrap_or(0);
        println!(
            "\r\n✅ decoding successful.\n\
             📂 input file:  {} ({} bytes)\n\
             💾 output file: {} ({} bytes)",
            config.input.display(),
            input_size,
            config.output.display(),
            restored
        );
    }

    info!("--- End ---");
}
