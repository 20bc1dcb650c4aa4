//! This module defines the `Command` enum and its associated methods for parsing
//! and handling user commands in the FAT32 explorer shell.
//!
//! The `Command` enum represents the commands that the user can input,
//! such as opening an image, listing a directory, printing a file, or handling
//! invalid or unknown commands.

/// Represents a user command in the FAT32 explorer shell.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Command to quit the program.
    Quit,
    /// Command to open a volume image, encapsulating the file path as a `String`.
    Open(String),
    /// Command to print the geometry of the open volume.
    Info,
    /// List a directory, the root if no path is given.
    Ls(Option<String>),
    /// Print every path of the volume, breadth first.
    Tree,
    /// Print the content of a file.
    Cat(String),
    /// Skip the boot structure validation on the next `open`.
    Skip,
    /// Command for an unknown input, encapsulating the raw input as a `String`.
    Unknown(String),
    /// Command for invalid input, encapsulating an error message as a `String`.
    Invalid(String),
    /// Command for an empty input.
    Empty,
}

impl Command {
    /// Parses a string into a `Command` instance.
    ///
    /// # Parameters
    /// - `s`: A string slice representing the user input.
    ///
    /// # Returns
    /// - `Command::Quit` if the input is "quit".
    /// - `Command::Open` with the file path if the input starts with "open" followed by a valid argument.
    /// - `Command::Info` if the input is "info".
    /// - `Command::Ls` with the optional path if the input starts with "ls".
    /// - `Command::Tree` if the input is "tree".
    /// - `Command::Cat` with the file path if the input starts with "cat" followed by a valid argument.
    /// - `Command::Skip` if the input is "skip".
    /// - `Command::Unknown` if the input does not match any known command.
    /// - `Command::Invalid` if "open" or "cat" is missing its argument.
    /// - `Command::Empty` if the input is empty or contains only whitespace.
    pub fn from_string(s: &str) -> Self {
        let mut parts = s.split_whitespace();
        match parts.next() {
            Some("quit") => Command::Quit,
            Some("open") => match parts.next() {
                Some(arg) => Command::Open(arg.to_string()),
                None => Command::Invalid(String::from(
                    "Missing arg: 'open' expects the path to a '.img' file.",
                )),
            },
            Some("info") => Command::Info,
            Some("ls") => Command::Ls(parts.next().map(str::to_string)),
            Some("tree") => Command::Tree,
            Some("cat") => match parts.next() {
                Some(arg) => Command::Cat(arg.to_string()),
                None => Command::Invalid(String::from(
                    "Missing arg: 'cat' expects the path of a file on the volume.",
                )),
            },
            Some("skip") => Command::Skip,
            Some(other) => Command::Unknown(other.to_string()),
            None => Command::Empty,
        }
    }
}
