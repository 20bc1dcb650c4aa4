//! This is the main entry point for the FAT32 explorer shell.
//!
//! The program provides an interactive command-line interface for browsing FAT32 volume
//! images. Users can open an image, list directories, print files and walk the tree.

use fat_explorer::commands::Command;
use fat_explorer::{FATError, MountOptions, Node, Volume};
use log::{error, warn};
use std::{
    fs::File,
    io::{self, Write},
};

/// Represents the runtime state of the program.
struct RunState {
    /// The currently open volume image.
    volume: Option<Volume<File>>,
    /// Enable the validation of the boot structures
    validate: bool,
}

fn main() {
    stderrlog::new()
        .module(module_path!())
        .module("fat_explorer")
        .verbosity(2)
        .init()
        .unwrap();

    let mut run_state = RunState {
        volume: None,
        validate: true,
    };

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut s = String::new();
        match io::stdin().read_line(&mut s) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                error!("Failed to read command: {err}");
                break;
            }
        }

        match Command::from_string(&s) {
            Command::Open(path) => {
                let options = MountOptions {
                    validate: run_state.validate,
                };
                match File::open(&path)
                    .map_err(FATError::from)
                    .and_then(|file| Volume::open_with(file, options))
                {
                    Ok(volume) => run_state.volume = Some(volume),
                    Err(err) => error!("{err}"),
                }
            }
            Command::Quit => break,
            Command::Info => match &run_state.volume {
                Some(volume) => print!("{}", volume.geometry()),
                None => warn!("Open a volume image first"),
            },
            Command::Ls(path) => match &run_state.volume {
                Some(volume) => {
                    if let Err(err) = list(volume, path.as_deref().unwrap_or("/")) {
                        error!("{err}");
                    }
                }
                None => warn!("Open a volume image first"),
            },
            Command::Tree => match &run_state.volume {
                Some(volume) => {
                    for node in volume.walk() {
                        match node {
                            Ok(node) => println!("{}", node.path()),
                            Err(err) => error!("Tree walk failed: {err}"),
                        }
                    }
                }
                None => warn!("Open a volume image first"),
            },
            Command::Cat(path) => match &run_state.volume {
                Some(volume) => {
                    if let Err(err) = cat(volume, &path) {
                        error!("{err}");
                    }
                }
                None => warn!("Open a volume image first"),
            },
            Command::Skip => run_state.validate = false,
            Command::Unknown(s) => error!("Unknown command: {s:?}"),
            Command::Invalid(s) => error!("{s}"),
            Command::Empty => {}
        }
    }
}

fn list(volume: &Volume<File>, path: &str) -> Result<(), FATError> {
    match volume.resolve(path)? {
        Node::Directory(dir) => {
            for entry in dir.entries() {
                println!("  {entry}");
            }
        }
        Node::File(file) => println!("  {} {}B", file.name(), file.size()),
    }
    Ok(())
}

fn cat(volume: &Volume<File>, path: &str) -> Result<(), FATError> {
    match volume.resolve(path)? {
        Node::File(file) => {
            let data = file.read_all()?;
            let mut stdout = io::stdout();
            stdout.write_all(&data)?;
            stdout.flush()?;
            Ok(())
        }
        Node::Directory(_) => Err(FATError::NotFound(format!("{path} is a directory"))),
    }
}
