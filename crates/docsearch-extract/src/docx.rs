//! DOCX extraction: stream `word/document.xml` and rebuild readable
//! paragraphs and table rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use quick_xml::events::Event;
use quick_xml::Reader;

pub fn extract_docx(path: &Path) -> anyhow::Result<String> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).context("not a valid DOCX container")?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("word/document.xml missing from archive")?
        .read_to_string(&mut xml)?;
    parse_document_xml(&xml)
}

/// Walk the wordprocessingml body. Text lives in `w:t` runs; paragraphs
/// end at `w:p`, table cells at `w:tc`, rows at `w:tr`. Documents
/// written in vertical layout store one syllable per paragraph, so runs
/// of paragraphs with at most two chars are merged with no separator.
fn parse_document_xml(xml: &str) -> anyhow::Result<String> {
    let mut reader = Reader::from_str(xml);

    let mut parts: Vec<String> = Vec::new();
    // pending run of one/two-char paragraphs
    let mut short_buffer: Vec<String> = Vec::new();
    let mut current_para = String::new();
    let mut current_cell = String::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut in_text = false;
    let mut table_depth = 0usize;

    let flush_short = |parts: &mut Vec<String>, buffer: &mut Vec<String>| {
        if !buffer.is_empty() {
            parts.push(buffer.concat());
            buffer.clear();
        }
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"tbl" => table_depth += 1,
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if in_text {
                    let text = t.unescape()?;
                    if table_depth > 0 {
                        current_cell.push_str(&text);
                    } else {
                        current_para.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"p" => {
                    if table_depth > 0 {
                        // paragraphs inside a cell become one space-joined line
                        if !current_cell.ends_with(' ') && !current_cell.is_empty() {
                            current_cell.push(' ');
                        }
                    } else {
                        let para = current_para.trim().to_string();
                        current_para.clear();
                        if para.is_empty() {
                            continue;
                        }
                        if para.chars().count() <= 2 {
                            short_buffer.push(para);
                        } else {
                            flush_short(&mut parts, &mut short_buffer);
                            parts.push(para);
                        }
                    }
                }
                b"tc" => {
                    let cell = current_cell.trim().to_string();
                    current_cell.clear();
                    if !cell.is_empty() {
                        current_row.push(cell);
                    }
                }
                b"tr" => {
                    if !current_row.is_empty() {
                        flush_short(&mut parts, &mut short_buffer);
                        parts.push(current_row.join(" | "));
                        current_row.clear();
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(anyhow::anyhow!("malformed document.xml: {e}")),
        }
    }
    flush_short(&mut parts, &mut short_buffer);

    Ok(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::parse_document_xml;

    #[test]
    fn merges_single_char_paragraph_runs() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>취</w:t></w:r></w:p>
            <w:p><w:r><w:t>업</w:t></w:r></w:p>
            <w:p><w:r><w:t>규</w:t></w:r></w:p>
            <w:p><w:r><w:t>칙</w:t></w:r></w:p>
            <w:p><w:r><w:t>제1조 (목적) 이 규칙은 복무를 정한다.</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = parse_document_xml(xml).expect("parse");
        assert!(text.starts_with("취업규칙\n"));
        assert!(text.contains("제1조 (목적)"));
    }

    #[test]
    fn table_rows_join_cells_with_pipes() {
        let xml = r#"<w:document><w:body>
            <w:tbl><w:tr>
                <w:tc><w:p><w:r><w:t>구분</w:t></w:r></w:p></w:tc>
                <w:tc><w:p><w:r><w:t>일수</w:t></w:r></w:p></w:tc>
            </w:tr></w:tbl>
        </w:body></w:document>"#;
        let text = parse_document_xml(xml).expect("parse");
        assert_eq!(text, "구분 | 일수");
    }
}
