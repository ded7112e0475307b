use std::env;
use std::process;
use std::time::Instant;

use log::{error, info};

use huffpack::config::EncodeConfig;
use huffpack::files::compress_file;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("encode", String::as_str);

    let config = match EncodeConfig::from_args(args.iter().skip(1).cloned()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("Usage: {} {}", program, EncodeConfig::USAGE);
            eprintln!("  📂 <input_file>:  path to the file to encode.");
            eprintln!("  💾 [output_file]: path to write the encoded output (default output.huff).");
            process::exit(1);
        }
    };

    info!("--- Start Encoding ---");
    let start_time = Instant::now();

    let report = match compress_file(&config.input, &config.output) {
        Ok(report) => report,
        Err(e) => {
            error!("Encoding failed: {}", e);
            process::exit(1);
        }
    };

    info!("Encoding finished in {:.2?}.", start_time.elapsed());

    if !config.quiet {
        println!(
            "\r\n✅ Encoding successful.\n\
             📂  Input:       {} ({} bytes)\n\
             💾  Output:      {} ({} bytes, codebook {} bytes)\n\
             🔣  Symbols:     {}\n\
             ℹ️  Entropy:     {:.4} bits/symbol\n\
             📏  Code length: {:.4} bits/symbol\n\
             🗜️  Savings:     {:.4}%",
            config.input.display(),
            report.original_len,
            config.output.display(),
            report.compressed_len,
            report.codebook_len,
            report.unique_symbols,
            report.entropy,
            report.bits_per_symbol(),
            report.savings_percent()
        );
    }

    info!("--- End ---");
}
