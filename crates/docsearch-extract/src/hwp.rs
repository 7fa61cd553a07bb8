//! HWP extraction via prioritized fallback strategies.
//!
//! Two container generations exist in the corpus: HWPX (a ZIP of XML
//! sections, HWP 2014+) and HWP 5.0 (an OLE2 compound file with
//! deflate-compressed UTF-16LE body sections). Strategies are tried in
//! fixed order and the first one that yields text wins; there is no
//! shared state between attempts.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use docsearch_core::error::Error;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

pub trait ExtractStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn try_extract(&self, path: &Path) -> anyhow::Result<String>;
}

pub fn strategies() -> Vec<Box<dyn ExtractStrategy>> {
    vec![Box::new(HwpxStrategy), Box::new(Hwp5Strategy)]
}

pub fn extract_hwp(path: &Path) -> anyhow::Result<String> {
    for strategy in strategies() {
        match strategy.try_extract(path) {
            Ok(text) if !text.trim().is_empty() => {
                debug!(
                    strategy = strategy.name(),
                    chars = text.chars().count(),
                    "HWP extraction succeeded"
                );
                return Ok(text);
            }
            Ok(_) => {
                debug!(strategy = strategy.name(), "strategy produced no text");
            }
            Err(e) => {
                debug!(strategy = strategy.name(), error = %e, "strategy failed");
            }
        }
    }
    Err(Error::Extraction {
        path: path.to_path_buf(),
        reason: "every extraction strategy failed".to_string(),
    }
    .into())
}

/// HWPX: ZIP container holding `Contents/section*.xml`. All text nodes
/// of every section are collected in document order.
pub struct HwpxStrategy;

impl ExtractStrategy for HwpxStrategy {
    fn name(&self) -> &'static str {
        "hwpx"
    }

    fn try_extract(&self, path: &Path) -> anyhow::Result<String> {
        let file = std::fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file).context("not a ZIP container")?;

        let mut section_names: Vec<String> = archive
            .file_names()
            .filter(|n| n.to_lowercase().contains("section") && n.ends_with(".xml"))
            .map(str::to_string)
            .collect();
        if section_names.is_empty() {
            bail!("no section XML files in archive");
        }
        section_names.sort();

        let mut parts: Vec<String> = Vec::new();
        for name in section_names {
            let mut xml = String::new();
            archive.by_name(&name)?.read_to_string(&mut xml)?;
            collect_text_nodes(&xml, &mut parts)?;
        }
        if parts.is_empty() {
            bail!("no text nodes found in section XML");
        }
        Ok(parts.join(" "))
    }
}

fn collect_text_nodes(xml: &str, parts: &mut Vec<String>) -> anyhow::Result<()> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                let text = t.unescape()?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => bail!("malformed section XML: {e}"),
        }
    }
    Ok(())
}

/// HWP 5.0: OLE2 compound file. Requires a `FileHeader` stream; body
/// text lives in `BodyText/Section*` streams, raw-deflate compressed
/// (older files store them uncompressed) and encoded as UTF-16LE with
/// interleaved control records, which the printable filter strips.
pub struct Hwp5Strategy;

impl ExtractStrategy for Hwp5Strategy {
    fn name(&self) -> &'static str {
        "hwp5"
    }

    fn try_extract(&self, path: &Path) -> anyhow::Result<String> {
        let mut comp = cfb::open(path).context("not an OLE2 compound file")?;
        if !comp.exists("/FileHeader") {
            bail!("FileHeader stream missing; not an HWP 5.0 file");
        }

        let mut sections: Vec<PathBuf> = comp
            .walk()
            .filter(|e| e.is_stream() && e.path().starts_with("/BodyText"))
            .map(|e| e.path().to_path_buf())
            .collect();
        if sections.is_empty() {
            bail!("no BodyText sections");
        }
        sections.sort();

        let mut parts: Vec<String> = Vec::new();
        for section in sections {
            let mut body = Vec::new();
            comp.open_stream(&section)?.read_to_end(&mut body)?;
            let unpacked = inflate_raw(&body).unwrap_or(body);
            let decoded = decode_utf16le(&unpacked);
            let clean: String = decoded
                .chars()
                .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
                .collect();
            let trimmed = clean.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
        if parts.is_empty() {
            bail!("no text recovered from BodyText sections");
        }
        Ok(parts.join("\n"))
    }
}

/// Raw deflate, the OLE2 equivalent of zlib with window bits -15.
fn inflate_raw(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let mut decoder = flate2::read::DeflateDecoder::new(data);
    decoder.read_to_end(&mut out).ok()?;
    Some(out)
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    char::decode_utf16(units).filter_map(|r| r.ok()).collect()
}
