use std::io::Write;

use anyhow::Result;
use clap::Parser;
use rand_core::RngCore;

use rand_xsg::xsg512::distill;
use rand_xsg::Hasher;

#[derive(Debug, Parser)]
#[command(name = "rand_xsg")]
#[command(about = "Keyed variable-width hashing with the XSG-512 generator")]
struct Args {
    /// Key the generator is distilled from.
    key: String,

    /// Strings to hash, one digest per line.
    inputs: Vec<String>,

    /// Digest width in bits.
    #[arg(short, long, default_value_t = 128)]
    width: usize,

    /// Ignore the inputs and write an endless raw byte stream to stdout.
    #[arg(long)]
    stream: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let gen = distill(args.key.as_bytes())?;

    if args.stream {
        let mut gen = gen;
        let mut stdout = std::io::stdout();
        let mut buf = vec![0u8; 0x10000];
        loop {
            gen.fill_bytes(&mut buf);
            stdout.write_all(&buf)?;
        }
    }

    for input in &args.inputs {
        println!("{}", gen.clone().hash(input.as_bytes(), args.width));
    }
    Ok(())
}
