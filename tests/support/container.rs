//! Minimal JFIF wrapper so encoded scans can be decoded by a reference decoder.
//!
//! Only what a baseline decoder needs: SOI, APP0, DQT, SOF0, DHT, SOS, the
//! segment, EOI.

#![allow(dead_code)]

use baseline_jpeg::jpeg::huffman::HuffmanTable;
use baseline_jpeg::jpeg::{HuffmanTables, QuantTables, Subsampling};

const SOI: u16 = 0xFFD8;
const EOI: u16 = 0xFFD9;
const APP0: u16 = 0xFFE0;
const DQT: u16 = 0xFFDB;
const SOF0: u16 = 0xFFC0;
const DHT: u16 = 0xFFC4;
const SOS: u16 = 0xFFDA;

/// Frame description for [`wrap`].
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub gray: bool,
    pub subsampling: Subsampling,
}

fn marker(out: &mut Vec<u8>, code: u16, payload: &[u8]) {
    out.extend_from_slice(&code.to_be_bytes());
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
}

fn dht(out: &mut Vec<u8>, class_id: u8, table: &HuffmanTable) {
    let mut payload = vec![class_id];
    payload.extend_from_slice(table.bits());
    payload.extend_from_slice(table.vals());
    marker(out, DHT, &payload);
}

/// Wrap an entropy-coded segment in a baseline JFIF file.
pub fn wrap(segment: &[u8], frame: Frame, quant: &QuantTables, huffman: &HuffmanTables) -> Vec<u8> {
    let mut out = Vec::with_capacity(segment.len() + 700);
    out.extend_from_slice(&SOI.to_be_bytes());

    // JFIF 1.01, no units, 1:1 density, no thumbnail
    marker(&mut out, APP0, b"JFIF\0\x01\x01\x00\x00\x01\x00\x01\x00\x00");

    let mut dqt = vec![0u8];
    dqt.extend_from_slice(quant.luma.zigzag());
    marker(&mut out, DQT, &dqt);
    if !frame.gray {
        let mut dqt = vec![1u8];
        dqt.extend_from_slice(quant.chroma.zigzag());
        marker(&mut out, DQT, &dqt);
    }

    let mut sof = vec![8];
    sof.extend_from_slice(&(frame.height as u16).to_be_bytes());
    sof.extend_from_slice(&(frame.width as u16).to_be_bytes());
    if frame.gray {
        sof.extend_from_slice(&[1, 1, 0x11, 0]);
    } else {
        let luma_sampling = match frame.subsampling {
            Subsampling::S444 => 0x11,
            Subsampling::S420 => 0x22,
        };
        sof.extend_from_slice(&[3, 1, luma_sampling, 0, 2, 0x11, 1, 3, 0x11, 1]);
    }
    marker(&mut out, SOF0, &sof);

    dht(&mut out, 0x00, &huffman.dc_luma);
    dht(&mut out, 0x10, &huffman.ac_luma);
    if !frame.gray {
        dht(&mut out, 0x01, &huffman.dc_chroma);
        dht(&mut out, 0x11, &huffman.ac_chroma);
    }

    let sos: &[u8] = if frame.gray {
        &[1, 1, 0x00, 0, 63, 0]
    } else {
        &[3, 1, 0x00, 2, 0x11, 3, 0x11, 0, 63, 0]
    };
    marker(&mut out, SOS, sos);

    out.extend_from_slice(segment);
    out.extend_from_slice(&EOI.to_be_bytes());
    out
}
