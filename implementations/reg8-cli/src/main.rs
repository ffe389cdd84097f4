use std::{
    fs::File,
    io::{stdout, BufReader, Read, Write},
    process::exit,
};

use reg8::{bus::OutputBus, machine::Machine};
use reg8asm::ImageAssembler;

/// Prints each value emitted by a `PRN` instruction as its own decimal
/// line on stdout.
struct StdoutBus;
impl OutputBus for StdoutBus {
    fn print(&mut self, value: u8) {
        println!("{value}");
        let _ = stdout().flush();
    }
}

fn main() {
    env_logger::init();

    // Parse args: exactly one positional, the program path.
    let mut args = std::env::args().skip(1);
    let path = match (args.next(), args.next()) {
        (Some(path), None) => path,
        _ => {
            eprintln!("expected usage: reg8-cli PROGRAM");
            exit(1);
        }
    };

    // Read the whole source up front: a read error must refuse the start,
    // never hand the loader a truncated stream.
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("{path}: {err}");
            exit(2);
        }
    };
    let mut source = Vec::new();
    if let Err(err) = BufReader::new(file).read_to_end(&mut source) {
        eprintln!("{path}: {err}");
        exit(2);
    }
    let image = match ImageAssembler::new().parse(source.iter().copied()) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("{path}: {err}");
            exit(1);
        }
    };
    log::info!("loaded {} byte image from {path}", image.len());

    // Create our machine and run the image to its halt instruction.
    let mut machine = Machine::new();
    if let Err(fault) = machine
        .load(&image)
        .and_then(|()| machine.run(&mut StdoutBus))
    {
        eprintln!("fault: {fault}");
        exit(1);
    }
}
