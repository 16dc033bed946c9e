use anyhow::Error;
use structopt::StructOpt;

use textframe::Options;

fn main() -> Result<(), Error> {
    let options = Options::from_args();

    textframe::Logger::init("TEXTFRAME_LOG", options.log_file())?;

    textframe::run(options)
}
