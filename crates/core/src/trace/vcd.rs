//! Value Change Dump writer.
//!
//! Writes IEEE 1364 VCD text. It performs:
//! 1. **Header:** `$version`, `$timescale`, nested `$scope module` blocks and one `$var wire` per signal.
//! 2. **Initial Values:** A `$dumpvars` block holding every signal at the first sample.
//! 3. **Changes:** A `#<time>` marker per sample followed only by the signals that changed.
//!
//! Signals deeper than the requested depth are dropped at `open` and never sampled again.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::common::{SimTime, TimeUnit, TraceError};
use crate::model::SignalDecl;
use crate::trace::TraceSink;

/// First printable character usable in a VCD identifier code.
const ID_FIRST: u8 = b'!';
/// Number of printable characters usable in a VCD identifier code (`!` through `~`).
const ID_RADIX: usize = 94;

/// A traced signal after depth filtering.
#[derive(Debug)]
struct Traced {
    /// Index into the caller's sample slice.
    source: usize,
    decl: SignalDecl,
    code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Created,
    Open,
    Closed,
}

/// VCD backend for [`TraceSink`].
#[derive(Debug)]
pub struct VcdWriter<W: Write> {
    out: W,
    state: State,
    declared: usize,
    traced: Vec<Traced>,
    last: Vec<u64>,
    samples: u64,
}

impl VcdWriter<BufWriter<File>> {
    /// Creates (truncating) a VCD file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::Create` if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, TraceError> {
        let file = File::create(path).map_err(|source| TraceError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "created VCD trace file");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> VcdWriter<W> {
    /// Wraps an arbitrary writer. Nothing is written until `open`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            state: State::Created,
            declared: 0,
            traced: Vec::new(),
            last: Vec::new(),
            samples: 0,
        }
    }

    /// Returns the number of signals that passed the depth filter.
    pub fn traced_signals(&self) -> usize {
        self.traced.len()
    }

    /// Consumes the writer and returns the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self, unit: TimeUnit) -> Result<(), TraceError> {
        writeln!(
            self.out,
            "$version\n  {} {}\n$end",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(self.out, "$timescale 1{unit} $end")?;

        let mut open_scopes: Vec<&str> = Vec::new();
        for sig in &self.traced {
            let scopes: Vec<&str> = sig.decl.scopes().collect();
            let common = open_scopes
                .iter()
                .zip(&scopes)
                .take_while(|(a, b)| a == b)
                .count();
            while open_scopes.len() > common {
                let _ = open_scopes.pop();
                writeln!(self.out, "$upscope $end")?;
            }
            for scope in &scopes[common..] {
                writeln!(self.out, "$scope module {scope} $end")?;
                open_scopes.push(*scope);
            }
            if sig.decl.width() == 1 {
                writeln!(self.out, "$var wire 1 {} {} $end", sig.code, sig.decl.name())?;
            } else {
                writeln!(
                    self.out,
                    "$var wire {} {} {} [{}:0] $end",
                    sig.decl.width(),
                    sig.code,
                    sig.decl.name(),
                    sig.decl.width() - 1
                )?;
            }
        }
        for _ in &open_scopes {
            writeln!(self.out, "$upscope $end")?;
        }
        writeln!(self.out, "$enddefinitions $end")?;
        Ok(())
    }

    fn write_value(out: &mut W, sig: &Traced, value: u64) -> Result<(), TraceError> {
        if sig.decl.width() == 1 {
            writeln!(out, "{}{}", value & 1, sig.code)?;
        } else {
            writeln!(out, "b{value:b} {}", sig.code)?;
        }
        Ok(())
    }
}

impl<W: Write> TraceSink for VcdWriter<W> {
    fn open(
        &mut self,
        signals: &[SignalDecl],
        depth: u32,
        unit: TimeUnit,
    ) -> Result<(), TraceError> {
        let mut traced: Vec<Traced> = signals
            .iter()
            .enumerate()
            .filter(|(_, decl)| decl.depth() <= depth)
            .map(|(source, decl)| Traced {
                source,
                decl: decl.clone(),
                code: String::new(),
            })
            .collect();
        // Group by scope so each module block is opened once.
        traced.sort_by(|a, b| a.decl.scopes().cmp(b.decl.scopes()));
        for (i, sig) in traced.iter_mut().enumerate() {
            sig.code = id_code(i);
        }

        self.declared = signals.len();
        self.traced = traced;
        self.write_header(unit)?;
        self.state = State::Open;
        debug!(
            declared = self.declared,
            traced = self.traced.len(),
            depth,
            "VCD header written"
        );
        Ok(())
    }

    fn record(&mut self, time: SimTime, values: &[u64]) -> Result<(), TraceError> {
        if self.state != State::Open {
            return Err(TraceError::NotOpen);
        }
        if values.len() != self.declared {
            return Err(TraceError::SampleWidth {
                expected: self.declared,
                got: values.len(),
            });
        }

        writeln!(self.out, "#{time}")?;
        if self.samples == 0 {
            writeln!(self.out, "$dumpvars")?;
            self.last.clear();
            for sig in &self.traced {
                let value = sig.decl.mask(values[sig.source]);
                Self::write_value(&mut self.out, sig, value)?;
                self.last.push(value);
            }
            writeln!(self.out, "$end")?;
        } else {
            for (sig, last) in self.traced.iter().zip(self.last.iter_mut()) {
                let value = sig.decl.mask(values[sig.source]);
                if value != *last {
                    Self::write_value(&mut self.out, sig, value)?;
                    *last = value;
                }
            }
        }
        self.samples += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TraceError> {
        if self.state == State::Closed {
            return Ok(());
        }
        self.state = State::Closed;
        self.out.flush()?;
        debug!(samples = self.samples, "VCD trace closed");
        Ok(())
    }

    fn samples(&self) -> u64 {
        self.samples
    }
}

/// Returns the short identifier code for the `index`-th traced signal.
fn id_code(mut index: usize) -> String {
    let mut code = String::new();
    loop {
        code.push(char::from(ID_FIRST + (index % ID_RADIX) as u8));
        index /= ID_RADIX;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    code
}
