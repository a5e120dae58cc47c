//! Word template filler: positional placeholder substitution over `<w:t>` runs.

use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader as XmlReader, Writer as XmlWriter};
use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::conf::{C_PART_DOCUMENT, TAG_TEXT};
use crate::spec::{DocxError, SpecFillOptions, SpecFillReport};
use crate::util::{
    compile_placeholder_regex, format_value, needs_space_preserve, replace_placeholder_runs,
    select_header_footer_parts,
};

/// Loaded, validated template package.
///
/// The package bytes are never modified; every fill opens its own in-memory
/// archive over them, so one template can be shared by any number of threads.
#[derive(Debug, Clone)]
pub struct DocxTemplate {
    v_bytes: Vec<u8>,
    l_parts_scan: Vec<String>,
    regex_placeholder: Regex,
}

impl DocxTemplate {
    /// Read and validate a template file.
    pub fn from_path<P: AsRef<Path>>(
        path_file_template: P,
        options: &SpecFillOptions,
    ) -> Result<Self, DocxError> {
        let path_file_template = path_file_template.as_ref();
        let v_bytes = fs::read(path_file_template).map_err(|e| DocxError::TemplateRead {
            path: path_file_template.to_path_buf(),
            source: e,
        })?;
        Self::from_bytes(v_bytes, options)
    }

    /// Validate template bytes and plan which parts get scanned.
    ///
    /// Fails when the bytes are not a zip package or `word/document.xml` is
    /// missing.
    pub fn from_bytes(v_bytes: Vec<u8>, options: &SpecFillOptions) -> Result<Self, DocxError> {
        let regex_placeholder = compile_placeholder_regex(&options.rule_placeholder)?;
        let archive = ZipArchive::new(Cursor::new(v_bytes.as_slice()))?;

        if archive.index_for_name(C_PART_DOCUMENT).is_none() {
            return Err(DocxError::MissingPart(C_PART_DOCUMENT.to_string()));
        }
        let mut l_parts_scan = vec![C_PART_DOCUMENT.to_string()];
        if options.if_scan_headers_footers {
            l_parts_scan.extend(select_header_footer_parts(archive.file_names()));
        }
        drop(archive);
        tracing::debug!(parts = ?l_parts_scan, "template parts planned for scan");

        Ok(Self {
            v_bytes,
            l_parts_scan,
            regex_placeholder,
        })
    }

    /// Parts scanned for placeholders, in scan order.
    pub fn parts(&self) -> &[String] {
        &self.l_parts_scan
    }

    /// Number of placeholders across scanned parts.
    pub fn count_placeholders(&self) -> Result<usize, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(self.v_bytes.as_slice()))?;
        let mut spec_report = SpecFillReport::default();
        let mut n_cursor = 0;
        for c_part in &self.l_parts_scan {
            let c_xml = read_part_to_string(&mut archive, c_part)?;
            rewrite_part_xml(
                c_part,
                &c_xml,
                &self.regex_placeholder,
                &[],
                &mut n_cursor,
                &mut spec_report,
            )?;
        }
        Ok(spec_report.cnt_placeholders)
    }

    /// Fill placeholders with `values` in document order and return the new
    /// package bytes.
    ///
    /// Numeric-looking values lose a trailing `.0`. Extra values are ignored;
    /// extra placeholders stay literal. Both cases show up in
    /// [`SpecFillReport::mismatch`], never as an error.
    pub fn fill(&self, values: &[String]) -> Result<(Vec<u8>, SpecFillReport), DocxError> {
        let l_values: Vec<String> = values.iter().map(|v| format_value(v)).collect();
        let mut spec_report = SpecFillReport {
            cnt_values: l_values.len(),
            ..SpecFillReport::default()
        };

        let mut archive = ZipArchive::new(Cursor::new(self.v_bytes.as_slice()))?;
        let mut dict_parts_patched: HashMap<String, Vec<u8>> = HashMap::new();
        let mut n_cursor = 0;
        for c_part in &self.l_parts_scan {
            let c_xml = read_part_to_string(&mut archive, c_part)?;
            let n_replaced_before = spec_report.cnt_replaced;
            let c_xml_new = rewrite_part_xml(
                c_part,
                &c_xml,
                &self.regex_placeholder,
                &l_values,
                &mut n_cursor,
                &mut spec_report,
            )?;
            if spec_report.cnt_replaced > n_replaced_before {
                dict_parts_patched.insert(c_part.clone(), c_xml_new.into_bytes());
            }
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(self.v_bytes.len())));
        for n_idx in 0..archive.len() {
            let file = archive.by_index_raw(n_idx)?;
            let c_name = file.name().to_string();
            match dict_parts_patched.remove(&c_name) {
                Some(v_xml) => {
                    drop(file);
                    let opts = SimpleFileOptions::default()
                        .compression_method(CompressionMethod::Deflated);
                    writer.start_file(c_name, opts)?;
                    writer.write_all(&v_xml)?;
                }
                None => writer.raw_copy_file(file)?,
            }
        }
        let v_bytes_out = writer.finish()?.into_inner();

        Ok((v_bytes_out, spec_report))
    }

    /// Fill and write the result to `path_file_out`.
    pub fn fill_to_path<P: AsRef<Path>>(
        &self,
        values: &[String],
        path_file_out: P,
    ) -> Result<SpecFillReport, DocxError> {
        let path_file_out = path_file_out.as_ref();
        let (v_bytes_out, spec_report) = self.fill(values)?;
        fs::write(path_file_out, v_bytes_out).map_err(|e| DocxError::Save {
            path: path_file_out.to_path_buf(),
            source: e,
        })?;
        Ok(spec_report)
    }
}

fn read_part_to_string(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    c_part: &str,
) -> Result<String, DocxError> {
    let mut file = archive
        .by_name(c_part)
        .map_err(|_| DocxError::MissingPart(c_part.to_string()))?;
    let mut c_xml = String::with_capacity(file.size() as usize);
    file.read_to_string(&mut c_xml)?;
    Ok(c_xml)
}

fn write_xml_event(
    writer: &mut XmlWriter<Vec<u8>>,
    event: Event<'_>,
    c_part: &str,
) -> Result<(), DocxError> {
    writer.write_event(event).map_err(|e| DocxError::Xml {
        part: c_part.to_string(),
        message: e.to_string(),
    })
}

/// Stream one XML part, substituting placeholders inside `<w:t>` text only.
///
/// Run properties and every other node pass through untouched. A rewritten
/// `<w:t>` gets `xml:space="preserve"` when its new text has edge whitespace.
fn rewrite_part_xml(
    c_part: &str,
    c_xml: &str,
    regex_placeholder: &Regex,
    values: &[String],
    n_cursor: &mut usize,
    spec_report: &mut SpecFillReport,
) -> Result<String, DocxError> {
    let mut reader = XmlReader::from_str(c_xml);
    reader.config_mut().trim_text(false);
    let mut writer = XmlWriter::new(Vec::with_capacity(c_xml.len()));
    let mut start_text_pending: Option<BytesStart<'_>> = None;

    loop {
        let event = reader.read_event().map_err(|e| DocxError::Xml {
            part: c_part.to_string(),
            message: format!("at byte {}: {e}", reader.buffer_position()),
        })?;

        match event {
            Event::Start(e) if e.name().as_ref() == TAG_TEXT => {
                if let Some(start) = start_text_pending.take() {
                    write_xml_event(&mut writer, Event::Start(start), c_part)?;
                }
                start_text_pending = Some(e);
            }
            Event::Text(e) => {
                let Some(mut start) = start_text_pending.take() else {
                    write_xml_event(&mut writer, Event::Text(e), c_part)?;
                    continue;
                };
                let c_text = e.unescape().map_err(|err| DocxError::Xml {
                    part: c_part.to_string(),
                    message: err.to_string(),
                })?;
                let (c_text_new, n_found, n_replaced) =
                    replace_placeholder_runs(&c_text, regex_placeholder, values, n_cursor);
                spec_report.cnt_placeholders += n_found;
                spec_report.cnt_replaced += n_replaced;

                if n_replaced == 0 {
                    write_xml_event(&mut writer, Event::Start(start), c_part)?;
                    write_xml_event(&mut writer, Event::Text(e), c_part)?;
                    continue;
                }
                let if_has_space_attr = start
                    .attributes()
                    .flatten()
                    .any(|a| a.key.as_ref() == b"xml:space");
                if !if_has_space_attr && needs_space_preserve(&c_text_new) {
                    start.push_attribute(("xml:space", "preserve"));
                }
                write_xml_event(&mut writer, Event::Start(start), c_part)?;
                write_xml_event(
                    &mut writer,
                    Event::Text(BytesText::new(&c_text_new)),
                    c_part,
                )?;
            }
            Event::Eof => {
                if let Some(start) = start_text_pending.take() {
                    write_xml_event(&mut writer, Event::Start(start), c_part)?;
                }
                break;
            }
            other => {
                if let Some(start) = start_text_pending.take() {
                    write_xml_event(&mut writer, Event::Start(start), c_part)?;
                }
                write_xml_event(&mut writer, other, c_part)?;
            }
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|e| DocxError::Xml {
        part: c_part.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Write};

    use zip::write::SimpleFileOptions;
    use zip::{ZipArchive, ZipWriter};

    use super::DocxTemplate;
    use crate::spec::{DocxError, EnumPlaceholderMismatch, SpecFillOptions};

    const C_NS: &str =
        r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn build_docx(l_parts: &[(&str, String)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", SimpleFileOptions::default())
            .expect("start");
        writer.write_all(b"<Types/>").expect("write");
        for (c_name, c_xml) in l_parts {
            writer
                .start_file(*c_name, SimpleFileOptions::default())
                .expect("start");
            writer.write_all(c_xml.as_bytes()).expect("write");
        }
        writer.finish().expect("finish").into_inner()
    }

    fn document_xml(c_body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {C_NS}><w:body>{c_body}</w:body></w:document>"#
        )
    }

    fn read_part(v_bytes: &[u8], c_part: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(v_bytes)).expect("zip");
        let mut file = archive.by_name(c_part).expect("part");
        let mut c_xml = String::new();
        file.read_to_string(&mut c_xml).expect("read");
        c_xml
    }

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn four_placeholder_body() -> String {
        concat!(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Client: ____</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Year ________ and ____</w:t></w:r></w:p>"#,
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:rPr><w:i/></w:rPr><w:t>____</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
            r#"<w:p><w:r><w:t>Sign: ___</w:t></w:r></w:p>"#
        )
        .to_string()
    }

    #[test]
    fn fill_replaces_in_document_order_and_keeps_run_format() {
        let v_template = build_docx(&[("word/document.xml", document_xml(&four_placeholder_body()))]);
        let template =
            DocxTemplate::from_bytes(v_template, &SpecFillOptions::default()).expect("template");
        assert_eq!(template.count_placeholders().expect("count"), 4);

        let (v_out, spec_report) = template
            .fill(&values(&["Acme Co", "2024.0", "x", "y"]))
            .expect("fill");
        assert_eq!(spec_report.cnt_placeholders, 4);
        assert_eq!(spec_report.cnt_replaced, 4);
        assert_eq!(spec_report.mismatch(), None);

        let c_xml = read_part(&v_out, "word/document.xml");
        assert!(c_xml.contains(r#"<w:rPr><w:b/></w:rPr><w:t>Client: Acme Co</w:t>"#));
        assert!(c_xml.contains("<w:t>Year 2024 and x</w:t>"));
        assert!(c_xml.contains(r#"<w:rPr><w:i/></w:rPr><w:t>y</w:t>"#));
        assert!(c_xml.contains("<w:t>Sign: ___</w:t>"));
        assert!(!c_xml.contains("2024.0"));
    }

    #[test]
    fn fill_with_extra_values_drops_them_silently() {
        let body = r#"<w:p><w:r><w:t>____ / ____</w:t></w:r></w:p>"#;
        let v_template = build_docx(&[("word/document.xml", document_xml(body))]);
        let template =
            DocxTemplate::from_bytes(v_template, &SpecFillOptions::default()).expect("template");

        let (v_out, spec_report) = template
            .fill(&values(&["a", "b", "c", "d"]))
            .expect("fill");
        assert_eq!(
            spec_report.mismatch(),
            Some(EnumPlaceholderMismatch::UnusedValues(2))
        );
        assert!(read_part(&v_out, "word/document.xml").contains("<w:t>a / b</w:t>"));
    }

    #[test]
    fn fill_with_missing_values_keeps_placeholders_literal() {
        let v_template = build_docx(&[("word/document.xml", document_xml(&four_placeholder_body()))]);
        let template =
            DocxTemplate::from_bytes(v_template, &SpecFillOptions::default()).expect("template");

        let (v_out, spec_report) = template.fill(&values(&["Acme"])).expect("fill");
        assert_eq!(
            spec_report.mismatch(),
            Some(EnumPlaceholderMismatch::UnfilledPlaceholders(3))
        );
        let c_xml = read_part(&v_out, "word/document.xml");
        assert!(c_xml.contains("<w:t>Client: Acme</w:t>"));
        assert!(c_xml.contains("<w:t>Year ________ and ____</w:t>"));
    }

    #[test]
    fn fill_escapes_values_and_preserves_edge_whitespace() {
        let body = r#"<w:p><w:r><w:t>____</w:t></w:r><w:r><w:t xml:space="preserve">&amp; ____</w:t></w:r></w:p>"#;
        let v_template = build_docx(&[("word/document.xml", document_xml(body))]);
        let template =
            DocxTemplate::from_bytes(v_template, &SpecFillOptions::default()).expect("template");

        let (v_out, _) = template
            .fill(&values(&[" A<B ", "C&D"]))
            .expect("fill");
        let c_xml = read_part(&v_out, "word/document.xml");
        assert!(c_xml.contains(r#"<w:t xml:space="preserve"> A&lt;B </w:t>"#));
        assert!(c_xml.contains(r#"<w:t xml:space="preserve">&amp; C&amp;D</w:t>"#));
    }

    #[test]
    fn fill_leaves_template_and_other_parts_untouched() {
        let c_styles = "<w:styles/>".to_string();
        let v_template = build_docx(&[
            ("word/document.xml", document_xml("<w:p><w:r><w:t>____</w:t></w:r></w:p>")),
            ("word/styles.xml", c_styles.clone()),
        ]);
        let template = DocxTemplate::from_bytes(v_template.clone(), &SpecFillOptions::default())
            .expect("template");

        let (v_first, _) = template.fill(&values(&["one"])).expect("fill");
        let (v_second, _) = template.fill(&values(&["two"])).expect("fill");
        assert!(read_part(&v_first, "word/document.xml").contains("<w:t>one</w:t>"));
        assert!(read_part(&v_second, "word/document.xml").contains("<w:t>two</w:t>"));
        assert_eq!(read_part(&v_second, "word/styles.xml"), c_styles);
        assert_eq!(read_part(&v_second, "[Content_Types].xml"), "<Types/>");
        assert_eq!(template.count_placeholders().expect("count"), 1);
    }

    #[test]
    fn fill_scans_headers_and_footers_only_when_enabled() {
        let c_header = format!(r#"<w:hdr {C_NS}><w:p><w:r><w:t>Ref ____</w:t></w:r></w:p></w:hdr>"#);
        let v_template = build_docx(&[
            ("word/header1.xml", c_header),
            ("word/document.xml", document_xml("<w:p><w:r><w:t>____</w:t></w:r></w:p>")),
        ]);

        let template = DocxTemplate::from_bytes(v_template.clone(), &SpecFillOptions::default())
            .expect("template");
        assert_eq!(template.parts(), ["word/document.xml"]);
        assert_eq!(template.count_placeholders().expect("count"), 1);

        let options = SpecFillOptions {
            if_scan_headers_footers: true,
            ..SpecFillOptions::default()
        };
        let template = DocxTemplate::from_bytes(v_template, &options).expect("template");
        let (v_out, spec_report) = template.fill(&values(&["body", "head"])).expect("fill");
        assert_eq!(spec_report.cnt_replaced, 2);
        assert!(read_part(&v_out, "word/document.xml").contains("<w:t>body</w:t>"));
        assert!(read_part(&v_out, "word/header1.xml").contains("<w:t>Ref head</w:t>"));
    }

    #[test]
    fn from_bytes_rejects_invalid_packages() {
        assert!(matches!(
            DocxTemplate::from_bytes(b"not a zip".to_vec(), &SpecFillOptions::default()),
            Err(DocxError::Zip(_))
        ));

        let v_template = build_docx(&[("word/styles.xml", "<w:styles/>".to_string())]);
        assert!(matches!(
            DocxTemplate::from_bytes(v_template, &SpecFillOptions::default()),
            Err(DocxError::MissingPart(_))
        ));
    }

    #[test]
    fn fill_to_path_writes_file_and_reports_save_errors() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let v_template =
            build_docx(&[("word/document.xml", document_xml("<w:p><w:r><w:t>____</w:t></w:r></w:p>"))]);
        let template =
            DocxTemplate::from_bytes(v_template, &SpecFillOptions::default()).expect("template");

        let path_out = tmp.path().join("Acme.docx");
        template
            .fill_to_path(&values(&["Acme"]), &path_out)
            .expect("fill to path");
        let v_out = std::fs::read(&path_out).expect("read output");
        assert!(read_part(&v_out, "word/document.xml").contains("<w:t>Acme</w:t>"));

        let path_bad = tmp.path().join("missing_dir").join("Acme.docx");
        assert!(matches!(
            template.fill_to_path(&values(&["Acme"]), &path_bad),
            Err(DocxError::Save { .. })
        ));
    }
}
