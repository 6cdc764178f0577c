// src/main.rs

use cmdchain::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) if code != 0 => std::process::exit(code),
        Ok(_) => {}
        Err(err) => {
            eprintln!("cmdchain error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
