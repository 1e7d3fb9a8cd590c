//! Baseline entropy coding of quantized blocks.
//!
//! A block of 64 zigzag-ordered coefficients becomes one DC symbol (the
//! magnitude category of the difference from the previous block of the same
//! component) and a list of AC run/size symbols, each followed by its extra
//! bits. Where the symbols go is up to the [`EntropySink`].

use crate::bits::BitWriter;
use crate::jpeg::huffman::{HuffmanTable, HuffmanTables, EOB, ZRL};

/// Color component a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Y,
    Cb,
    Cr,
}

impl Component {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Component::Y => 0,
            Component::Cb => 1,
            Component::Cr => 2,
        }
    }

    #[inline]
    pub fn is_luma(self) -> bool {
        self == Component::Y
    }
}

/// Number of bits needed to represent `|value|`.
#[inline]
pub fn category(value: i32) -> u8 {
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// Extra bits following a symbol of category `cat`: the value itself when
/// positive, `value - 1` truncated to `cat` bits when negative.
#[inline]
pub fn magnitude_bits(value: i32, cat: u8) -> u32 {
    let v = if value < 0 { value - 1 } else { value };
    (v as u32) & ((1u32 << cat) - 1)
}

/// A Huffman symbol and its extra bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// DC magnitude category; `bits` holds `category` extra bits.
    Dc { category: u8, bits: u32 },
    /// AC `(run << 4) | size`; `bits` holds `size` extra bits.
    Ac { run_size: u8, bits: u32 },
}

impl Symbol {
    /// Number of extra bits that follow the code.
    #[inline]
    pub fn extra_len(self) -> u8 {
        match self {
            Symbol::Dc { category, .. } => category,
            Symbol::Ac { run_size, .. } => run_size & 0x0F,
        }
    }
}

/// Receiver of the symbols produced for each block.
pub trait EntropySink {
    fn emit(&mut self, component: Component, symbol: Symbol);
}

/// Records every symbol; used by tests and diagnostics.
impl EntropySink for Vec<(Component, Symbol)> {
    fn emit(&mut self, component: Component, symbol: Symbol) {
        self.push((component, symbol));
    }
}

/// Writes Huffman codes and extra bits to a [`BitWriter`].
pub struct HuffmanSink<'a> {
    writer: &'a mut BitWriter,
    tables: &'a HuffmanTables,
}

impl<'a> HuffmanSink<'a> {
    pub fn new(writer: &'a mut BitWriter, tables: &'a HuffmanTables) -> Self {
        Self { writer, tables }
    }

    #[inline]
    fn table(&self, component: Component, dc: bool) -> &'a HuffmanTable {
        match (component.is_luma(), dc) {
            (true, true) => &self.tables.dc_luma,
            (true, false) => &self.tables.ac_luma,
            (false, true) => &self.tables.dc_chroma,
            (false, false) => &self.tables.ac_chroma,
        }
    }
}

impl EntropySink for HuffmanSink<'_> {
    #[inline]
    fn emit(&mut self, component: Component, symbol: Symbol) {
        let (code, bits) = match symbol {
            Symbol::Dc { category, bits } => (self.table(component, true).code(category), bits),
            Symbol::Ac { run_size, bits } => (self.table(component, false).code(run_size), bits),
        };
        debug_assert!(code.length > 0, "{component:?} {symbol:?} has no code");
        self.writer.write_bits(code.code as u32, code.length);
        self.writer.write_bits(bits, symbol.extra_len());
    }
}

/// Last DC value seen per component. Zero at scan start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DcPredictors {
    values: [i32; 3],
}

impl DcPredictors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the prediction for `component` with `dc` and return the difference.
    #[inline]
    pub fn advance(&mut self, component: Component, dc: i32) -> i32 {
        let slot = &mut self.values[component.index()];
        let diff = dc - *slot;
        *slot = dc;
        diff
    }

    pub fn get(&self, component: Component) -> i32 {
        self.values[component.index()]
    }
}

/// What [`encode_block`] emitted besides coefficient symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockSummary {
    pub zero_runs: u32,
    pub end_of_block: bool,
}

/// Encode one zigzag-ordered block.
pub fn encode_block<S: EntropySink>(
    block: &[i32; 64],
    component: Component,
    predictors: &mut DcPredictors,
    sink: &mut S,
) -> BlockSummary {
    let mut summary = BlockSummary::default();

    let diff = predictors.advance(component, block[0]);
    let cat = category(diff);
    sink.emit(
        component,
        Symbol::Dc {
            category: cat,
            bits: magnitude_bits(diff, cat),
        },
    );

    let end = block.iter().rposition(|&c| c != 0).unwrap_or(0);
    if end == 0 {
        sink.emit(component, Symbol::Ac { run_size: EOB, bits: 0 });
        summary.end_of_block = true;
        return summary;
    }

    let mut run = 0u8;
    for &coef in &block[1..=end] {
        if coef == 0 {
            run += 1;
            continue;
        }

        while run >= 16 {
            sink.emit(component, Symbol::Ac { run_size: ZRL, bits: 0 });
            summary.zero_runs += 1;
            run -= 16;
        }

        let cat = category(coef);
        sink.emit(
            component,
            Symbol::Ac {
                run_size: (run << 4) | cat,
                bits: magnitude_bits(coef, cat),
            },
        );
        run = 0;
    }

    if end != 63 {
        sink.emit(component, Symbol::Ac { run_size: EOB, bits: 0 });
        summary.end_of_block = true;
    }

    summary
}
