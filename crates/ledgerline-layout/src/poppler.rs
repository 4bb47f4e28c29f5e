//! poppler-utils adapters
//!
//! Drives `pdfinfo`, `pdftotext` and `pdftoppm` as subprocesses to provide
//! page counts, word boxes, stream-mode tables and page images.

use crate::error::LayoutError;
use crate::tools::{path_arg, ToolRunner};
use ledgerline_domain::traits::{PageRasterizer, PageWords, TableRecognizer};
use ledgerline_domain::Token;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

fn pages_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^Pages:\s+(\d+)\s*$").expect("pages regex"))
}

fn cell_gap_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("cell gap regex"))
}

/// poppler-utils backed word source, table recognizer and rasterizer
#[derive(Debug, Clone, Default)]
pub struct Poppler {
    runner: ToolRunner,
}

impl Poppler {
    /// Use the poppler tools found on `PATH`
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the poppler tools in a specific directory
    pub fn with_bin_dir(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner: ToolRunner::new(Some(bin_dir.into())),
        }
    }

    /// Kill any poppler tool still running after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.runner = self.runner.with_timeout(timeout);
        self
    }

    /// Whether `pdftotext` can be started
    pub fn is_available(&self) -> bool {
        self.runner.available("pdftotext", "-v")
    }

    fn page_range(page: usize) -> [String; 4] {
        ["-f".to_string(), page.to_string(), "-l".to_string(), page.to_string()]
    }
}

impl PageWords for Poppler {
    type Error = LayoutError;

    fn page_count(&self, document: &Path) -> Result<usize, Self::Error> {
        let info = self.runner.run("pdfinfo", [path_arg(document)?])?;
        pages_re()
            .captures(&info)
            .and_then(|caps| caps[1].parse::<usize>().ok())
            .ok_or_else(|| LayoutError::Output {
                tool: "pdfinfo",
                message: "no page count".to_string(),
            })
    }

    fn words(&self, document: &Path, page: usize) -> Result<Vec<Token>, Self::Error> {
        let mut args: Vec<String> = vec!["-bbox".to_string()];
        args.extend(Self::page_range(page));
        args.push(path_arg(document)?.to_string());
        args.push("-".to_string());

        let xhtml = self.runner.run("pdftotext", &args)?;
        parse_bbox_words(&xhtml)
    }
}

impl TableRecognizer for Poppler {
    type Error = LayoutError;

    fn detect_tables(&self, document: &Path, page: usize) -> Result<Vec<Vec<String>>, Self::Error> {
        let mut args: Vec<String> = vec!["-layout".to_string()];
        args.extend(Self::page_range(page));
        args.push(path_arg(document)?.to_string());
        args.push("-".to_string());

        let text = self.runner.run("pdftotext", &args)?;
        Ok(split_stream_table(&text))
    }
}

impl PageRasterizer for Poppler {
    type Error = LayoutError;

    fn rasterize(&self, document: &Path, page: usize, dpi: u32) -> Result<Vec<u8>, Self::Error> {
        let scratch = tempfile::Builder::new().prefix("ledgerline-raster").tempdir()?;
        let prefix = scratch.path().join("page");

        let mut args: Vec<String> = vec!["-png".to_string(), "-r".to_string(), dpi.to_string()];
        args.extend(Self::page_range(page));
        args.push("-singlefile".to_string());
        args.push(path_arg(document)?.to_string());
        args.push(path_arg(&prefix)?.to_string());

        self.runner.run("pdftoppm", &args)?;
        Ok(std::fs::read(prefix.with_extension("png"))?)
    }
}

/// Parse the `<word>` elements of `pdftotext -bbox` output.
///
/// Attributes may come in any order and entities are decoded. Words with
/// blank text or a missing coordinate are skipped; output that is not
/// well-formed XML is an error.
pub fn parse_bbox_words(xhtml: &str) -> Result<Vec<Token>, LayoutError> {
    let malformed = |message: String| LayoutError::Output {
        tool: "pdftotext",
        message,
    };

    let mut reader = Reader::from_str(xhtml);
    let mut words = Vec::new();
    // Box and text of the <word> being read
    let mut current: Option<([Option<f64>; 4], String)> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => return Err(malformed(format!("at byte {}: {}", reader.buffer_position(), e))),
        };
        match event {
            Event::Start(e) if e.name().as_ref() == b"word" => {
                current = Some((word_box(&e).map_err(malformed)?, String::new()));
            }
            Event::Text(t) => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&t.unescape().map_err(|e| malformed(e.to_string()))?);
                }
            }
            Event::End(e) if e.name().as_ref() == b"word" => {
                if let Some(([Some(x0), Some(y0), Some(x1), Some(y1)], text)) = current.take() {
                    if !text.trim().is_empty() {
                        words.push(Token::new(text, x0, y0, x1, y1));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(words)
}

/// `xMin`, `yMin`, `xMax`, `yMax` of a `<word>` start tag
fn word_box(start: &BytesStart<'_>) -> Result<[Option<f64>; 4], String> {
    let mut coords = [None; 4];
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let slot = match attr.key.as_ref() {
            b"xMin" => 0,
            b"yMin" => 1,
            b"xMax" => 2,
            b"yMax" => 3,
            _ => continue,
        };
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        coords[slot] = value.trim().parse::<f64>().ok();
    }
    Ok(coords)
}

/// Split `pdftotext -layout` text into table rows.
///
/// Cells are separated by runs of two or more spaces; lines with fewer than
/// two cells are not table rows.
pub fn split_stream_table(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            cell_gap_re()
                .split(line)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|cells| cells.len() >= 2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBOX: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN">
<html xmlns="http://www.w3.org/1999/xhtml">
<body>
<doc>
  <page width="612.000000" height="792.000000">
    <word xMin="56.800000" yMin="57.208000" xMax="80.336000" yMax="71.344000">Date</word>
    <word xMin="300.100000" yMin="57.208000" xMax="330.000000" yMax="71.344000">Debit</word>
    <word xMin="100.000000" yMin="80.000000" xMax="140.000000" yMax="90.000000">M&amp;S</word>
  </page>
</doc>
</body>
</html>"#;

    #[test]
    fn test_parse_bbox_words() {
        let words = parse_bbox_words(BBOX).unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text, "Date");
        assert_eq!(words[0].x0, 56.8);
        assert_eq!(words[0].y0, 57.208);
        assert_eq!(words[1].x1, 330.0);
        assert_eq!(words[2].text, "M&S");
    }

    #[test]
    fn test_parse_bbox_without_words() {
        assert!(parse_bbox_words("<page></page>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_bbox_any_attribute_order() {
        let xhtml = r#"<page><word yMax="90.5" xMin="10" xMax="40" yMin="80.5">Credit</word></page>"#;
        let words = parse_bbox_words(xhtml).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!((words[0].x0, words[0].y0, words[0].x1, words[0].y1), (10.0, 80.5, 40.0, 90.5));
    }

    #[test]
    fn test_parse_bbox_decodes_entities() {
        let xhtml = r#"<page>
<word xMin="1" yMin="2" xMax="3" yMax="4">O&#39;Brien</word>
<word xMin="5" yMin="2" xMax="9" yMax="4">&quot;ATM&quot;</word>
<word xMin="10" yMin="2" xMax="12" yMax="4">&lt;&gt;</word>
</page>"#;
        let texts: Vec<String> = parse_bbox_words(xhtml).unwrap().into_iter().map(|w| w.text).collect();
        assert_eq!(texts, vec!["O'Brien", "\"ATM\"", "<>"]);
    }

    #[test]
    fn test_parse_bbox_skips_blank_and_unplaced_words() {
        let xhtml = r#"<page>
<word xMin="1" yMin="2" xMax="3" yMax="4">  </word>
<word xMin="1" yMin="2" xMax="3">Orphan</word>
<word xMin="1" yMin="2" xMax="3" yMax="4">Kept</word>
</page>"#;
        let words = parse_bbox_words(xhtml).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "Kept");
    }

    #[test]
    fn test_parse_bbox_malformed_is_an_error() {
        let err = parse_bbox_words(r#"<page><word xMin="1" yMin="2" xMax="3" yMax="4">Date</wrd></page>"#).unwrap_err();
        assert!(matches!(err, LayoutError::Output { tool: "pdftotext", .. }));
    }

    #[test]
    fn test_split_stream_table() {
        let text = "   ACCOUNT STATEMENT\n\n01/12/2025   POS Purchase Shoprite    7,037.31        26,397.74\n   Page 1 of 3\n";
        let rows = split_stream_table(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            vec!["01/12/2025", "POS Purchase Shoprite", "7,037.31", "26,397.74"]
        );
    }

    #[test]
    fn test_pages_regex() {
        let info = "Title:          Statement\nPages:          4\nEncrypted:      no\n";
        let caps = pages_re().captures(info).unwrap();
        assert_eq!(&caps[1], "4");
    }

    #[test]
    #[ignore] // Requires poppler-utils and a sample statement
    fn test_poppler_page_count_integration() {
        let poppler = Poppler::new();
        if poppler.is_available() {
            let result = poppler.page_count(Path::new("fixtures/statement.pdf"));
            assert!(result.is_ok());
        }
    }
}
