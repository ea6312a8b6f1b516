use cella::config::Config;
use cella::Driver;
use log::error;
use std::process;
use structopt::StructOpt;

#[tokio::main]
async fn main() {
    let config = Config::from_args();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .init();

    match Driver::new(config).run().await {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    }
}
