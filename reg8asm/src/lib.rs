//! # Reg8Asm
//! Loader for reg8 programs written in their textual form: one 8-character
//! binary literal per line, optionally followed by a `#` comment. Blank and
//! comment-only lines are skipped; every surviving literal becomes one byte
//! of the program image, in file order.
//!
//! Meant as a companion to the `reg8` core, and does not require `std` or
//! anything fancy: it works on **byte streams**, so a source file can be
//! fed to it as it is read rather than loaded whole into memory.
//!
//! The loader either produces a fully decoded image or refuses with an
//! error carrying the offending line, so the machine never sees a
//! half-decoded program.

#![no_std]

use heapless::Vec;


/// A program image cannot be larger than the machine's memory.
pub const IMAGE_CAPACITY: usize = 256;

/// A finished program image, ready to be handed to the machine.
pub type Image = Vec<u8, IMAGE_CAPACITY>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssembleError {
    /// A character that is neither a binary digit, whitespace nor `#`.
    UnexpectedCharacter { line: usize, found: char },
    /// A literal with fewer than 8 binary digits.
    LiteralTooShort { line: usize, digits: usize },
    /// A literal with more than 8 binary digits.
    LiteralTooLong { line: usize },
    /// More literals than the machine has memory cells.
    ImageOverflow { line: usize },
}

impl core::fmt::Display for AssembleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnexpectedCharacter { line, found } => {
                write!(f, "line {line}: unexpected character {found:?}")
            }
            Self::LiteralTooShort { line, digits } => {
                write!(f, "line {line}: literal has {digits} digits, expected 8")
            }
            Self::LiteralTooLong { line } => {
                write!(f, "line {line}: literal has more than 8 digits")
            }
            Self::ImageOverflow { line } => {
                write!(f, "line {line}: program image exceeds {IMAGE_CAPACITY} bytes")
            }
        }
    }
}

/// Keeps track of all information regarding the current load: the image
/// built so far, the literal being accumulated and the source line for
/// error reporting.
#[derive(Clone, Debug)]
pub struct ImageAssembler {
    // Current line of the file, 1-based
    line: usize,
    image: Image,

    // Literal being accumulated
    digits: usize,
    value: u8,
}

impl Default for ImageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageAssembler {
    pub fn new() -> Self {
        Self {
            line: 1,
            image: Image::new(),
            digits: 0,
            value: 0,
        }
    }

    /// Appends one binary digit to the literal being accumulated.
    fn push_digit(&mut self, digit: u8) -> Result<(), AssembleError> {
        if self.digits == 8 {
            return Err(AssembleError::LiteralTooLong { line: self.line });
        }
        self.value = (self.value << 1) | digit;
        self.digits += 1;
        Ok(())
    }

    /// Ends the literal being accumulated, if any, and appends its byte to
    /// the image.
    fn flush_literal(&mut self) -> Result<(), AssembleError> {
        match self.digits {
            0 => return Ok(()),
            8 => {}
            digits => {
                return Err(AssembleError::LiteralTooShort {
                    line: self.line,
                    digits,
                })
            }
        }
        log::trace!("line {}: {:#010b}", self.line, self.value);
        self.image
            .push(self.value)
            .map_err(|_| AssembleError::ImageOverflow { line: self.line })?;
        self.digits = 0;
        self.value = 0;
        Ok(())
    }

    /// Skips a `#` comment, not doing anything with it.
    fn walk_comment<I: Iterator<Item = u8>>(&mut self, source: &mut I) {
        for b in source {
            if b == b'\n' {
                self.line += 1;
                break;
            }
        }
    }

    /// Consumes the assembler to return either a fully decoded program
    /// image or an error if anything in the source is malformed.
    pub fn parse<I: Iterator<Item = u8>>(mut self, mut source: I) -> Result<Image, AssembleError> {
        while let Some(b) = source.next() {
            match b as char {
                '0' => self.push_digit(0)?,
                '1' => self.push_digit(1)?,
                '#' => {
                    // A comment also terminates the literal before it.
                    self.flush_literal()?;
                    self.walk_comment(&mut source);
                }
                '\n' => {
                    self.flush_literal()?;
                    self.line += 1;
                }
                c if c.is_whitespace() => self.flush_literal()?,
                c => {
                    return Err(AssembleError::UnexpectedCharacter {
                        line: self.line,
                        found: c,
                    })
                }
            }
        }
        self.flush_literal()?;

        log::debug!("decoded {} byte image", self.image.len());
        Ok(self.image)
    }

    /// Helper method to parse full strings.
    pub fn parse_string(self, source: &str) -> Result<Image, AssembleError> {
        self.parse(source.bytes())
    }
}
