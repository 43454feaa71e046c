//! Replays PDF page content streams into recorded pages.
//!
//! Only the operators that matter for ruled tables are interpreted: the
//! graphics state stack, path construction and painting, clipping, shading,
//! XObjects and the basic text operators. Form XObjects are replayed in place
//! while image XObjects and inline images become `DrawImage` events.
//! Coordinates are converted into top-left page space as they are read.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use rostergrid_core::interp::{Glyph, GraphicsEvent, RecordedPage};
use rostergrid_core::table::{BBox, Point, Rectangle};
use rostergrid_core::utils::{
    MATRIX_IDENTITY, Matrix, apply_matrix_pt, mult_matrix, translate_matrix,
};

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.5;

const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Forms nested deeper than this are not replayed.
const MAX_FORM_DEPTH: usize = 16;

/// Name reported for images drawn inline with `BI`.
const INLINE_IMAGE: &str = "inline";

/// Load the selected pages (1-indexed; all pages when `None`) of a PDF.
pub fn load_pdf(path: &Path, page_numbers: Option<&[usize]>) -> Result<Vec<RecordedPage>> {
    let doc = Document::load(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut pages = Vec::new();
    for (number, page_id) in doc.get_pages() {
        let number = number as usize;
        if let Some(selected) = page_numbers
            && !selected.contains(&number)
        {
            continue;
        }
        let media_box = media_box(&doc, page_id);
        let data = doc
            .get_page_content(page_id)
            .with_context(|| format!("failed to read content of page {number}"))?;
        let content = Content::decode(&data)
            .with_context(|| format!("failed to decode content of page {number}"))?;
        debug!(
            page = number,
            operations = content.operations.len(),
            "decoded page content"
        );
        let xobjects = PageXObjects { doc: &doc, page_id };
        pages.push(replay_page(number, media_box, &content.operations, &xobjects));
    }
    Ok(pages)
}

/// Look up a page attribute, following the page tree for inherited values.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = Some(page_id);
    while let Some(id) = current {
        let dict = doc.get_dictionary(id).ok()?;
        if let Ok(obj) = dict.get(key) {
            return Some(obj);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

fn media_box(doc: &Document, page_id: ObjectId) -> [f64; 4] {
    inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| resolve_rect(doc, obj))
        .unwrap_or_else(|| {
            warn!(?page_id, "page has no MediaBox; assuming US Letter");
            DEFAULT_MEDIA_BOX
        })
}

/// A named XObject painted by `Do`.
#[derive(Clone, Debug)]
pub enum XObject {
    Image,
    /// A form: its own content stream, drawn through `matrix`. `id` scopes
    /// the lookup of XObjects the form paints in turn.
    Form {
        id: Option<ObjectId>,
        matrix: Matrix,
        operations: Vec<Operation>,
    },
}

/// Resolves the XObject names used by a page's content.
pub trait XObjectLookup {
    /// Resolve `name` in the resources of `form`, or of the page when `form`
    /// is `None` or does not define it.
    fn xobject(&self, form: Option<ObjectId>, name: &[u8]) -> Option<XObject>;
}

/// XObjects reachable from a page of a loaded document.
struct PageXObjects<'a> {
    doc: &'a Document,
    page_id: ObjectId,
}

impl<'a> PageXObjects<'a> {
    fn xobject_dict(&self, resources: &'a Object) -> Option<&'a Dictionary> {
        let (_, resources) = self.doc.dereference(resources).ok()?;
        let entry = resources.as_dict().ok()?.get(b"XObject").ok()?;
        let (_, xobjects) = self.doc.dereference(entry).ok()?;
        xobjects.as_dict().ok()
    }

    fn form_resources(&self, id: ObjectId) -> Option<&'a Object> {
        let stream = self.doc.get_object(id).ok()?.as_stream().ok()?;
        stream.dict.get(b"Resources").ok()
    }

    fn load(&self, id: ObjectId) -> Option<XObject> {
        let stream = self.doc.get_object(id).ok()?.as_stream().ok()?;
        match stream.dict.get(b"Subtype").and_then(Object::as_name).ok()? {
            b"Image" => Some(XObject::Image),
            b"Form" => {
                let matrix = stream
                    .dict
                    .get(b"Matrix")
                    .and_then(Object::as_array)
                    .ok()
                    .and_then(|m| numbers::<6>(m))
                    .map(as_matrix)
                    .unwrap_or(MATRIX_IDENTITY);
                let data = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                match Content::decode(&data) {
                    Ok(content) => Some(XObject::Form {
                        id: Some(id),
                        matrix,
                        operations: content.operations,
                    }),
                    Err(e) => {
                        warn!(?id, error = %e, "failed to decode form XObject");
                        None
                    }
                }
            }
            _ => None,
        }
    }
}

impl XObjectLookup for PageXObjects<'_> {
    fn xobject(&self, form: Option<ObjectId>, name: &[u8]) -> Option<XObject> {
        let scopes = [
            form.and_then(|id| self.form_resources(id)),
            inherited(self.doc, self.page_id, b"Resources"),
        ];
        let id = scopes
            .into_iter()
            .flatten()
            .filter_map(|resources| self.xobject_dict(resources))
            .find_map(|dict| dict.get(name).and_then(Object::as_reference).ok())?;
        self.load(id)
    }
}

fn resolve_rect(doc: &Document, obj: &Object) -> Option<[f64; 4]> {
    let (_, obj) = doc.dereference(obj).ok()?;
    let values = obj.as_array().ok()?;
    let v = numbers::<4>(values)?;
    Some([
        v[0].min(v[2]),
        v[1].min(v[3]),
        v[0].max(v[2]),
        v[1].max(v[3]),
    ])
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// The first `N` operands as numbers.
fn numbers<const N: usize>(operands: &[Object]) -> Option<[f64; N]> {
    if operands.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, obj) in out.iter_mut().zip(operands) {
        *slot = number(obj)?;
    }
    Some(out)
}

/// Decode a string operand byte-wise.
fn latin1(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        _ => None,
    }
}

fn as_matrix(v: [f64; 6]) -> Matrix {
    (v[0], v[1], v[2], v[3], v[4], v[5])
}

#[derive(Clone, Copy, Debug)]
struct TextState {
    matrix: Matrix,
    line_matrix: Matrix,
    font_size: f64,
    leading: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: MATRIX_IDENTITY,
            line_matrix: MATRIX_IDENTITY,
            font_size: 1.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn next_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = translate_matrix(self.line_matrix, tx, ty);
        self.matrix = self.line_matrix;
    }
}

/// Content stream interpreter producing one recorded page.
struct PageReplay<'a> {
    page: RecordedPage,
    ctm: Matrix,
    stack: Vec<Matrix>,
    text: TextState,
    current: Option<Point>,
    xobjects: &'a dyn XObjectLookup,
    /// Forms being replayed, innermost last.
    forms: Vec<Option<ObjectId>>,
}

impl<'a> PageReplay<'a> {
    fn new(page_number: usize, media_box: [f64; 4], xobjects: &'a dyn XObjectLookup) -> Self {
        let [x0, y0, x1, y1] = media_box;
        // PDF user space has its origin bottom-left; flip into top-left space.
        let flip: Matrix = (1.0, 0.0, 0.0, -1.0, -x0, y1);
        Self {
            page: RecordedPage::new(page_number, x1 - x0, y1 - y0),
            ctm: flip,
            stack: Vec::new(),
            text: TextState::default(),
            current: None,
            xobjects,
            forms: Vec::new(),
        }
    }

    fn device(&self, x: f64, y: f64) -> Point {
        let (dx, dy) = apply_matrix_pt(self.ctm, x, y);
        Point::new(dx, dy)
    }

    fn emit(&mut self, event: GraphicsEvent) {
        self.page.push_event(event);
    }

    fn execute(&mut self, op: &Operation) {
        let operands = op.operands.as_slice();
        let handled = match op.operator.as_str() {
            "q" => {
                self.stack.push(self.ctm);
                true
            }
            "Q" => {
                if let Some(ctm) = self.stack.pop() {
                    self.ctm = ctm;
                } else {
                    warn!("graphics state stack underflow");
                }
                true
            }
            "cm" => numbers::<6>(operands)
                .map(|m| self.ctm = mult_matrix(as_matrix(m), self.ctm))
                .is_some(),

            "m" => numbers::<2>(operands)
                .map(|[x, y]| {
                    let p = self.device(x, y);
                    self.current = Some(p);
                    self.emit(GraphicsEvent::MoveTo(p));
                })
                .is_some(),
            "l" => numbers::<2>(operands)
                .map(|[x, y]| {
                    let p = self.device(x, y);
                    self.current = Some(p);
                    self.emit(GraphicsEvent::LineTo(p));
                })
                .is_some(),
            "c" => numbers::<6>(operands)
                .map(|[x1, y1, x2, y2, x3, y3]| {
                    let c1 = self.device(x1, y1);
                    let c2 = self.device(x2, y2);
                    let end = self.device(x3, y3);
                    self.curve(c1, c2, end);
                })
                .is_some(),
            "v" => numbers::<4>(operands)
                .map(|[x2, y2, x3, y3]| {
                    let c2 = self.device(x2, y2);
                    let end = self.device(x3, y3);
                    let c1 = self.current.unwrap_or(c2);
                    self.curve(c1, c2, end);
                })
                .is_some(),
            "y" => numbers::<4>(operands)
                .map(|[x1, y1, x3, y3]| {
                    let c1 = self.device(x1, y1);
                    let end = self.device(x3, y3);
                    self.curve(c1, end, end);
                })
                .is_some(),
            "h" => {
                self.emit(GraphicsEvent::ClosePath);
                true
            }
            "re" => numbers::<4>(operands)
                .map(|[x, y, w, h]| {
                    let rect = Rectangle::new(
                        self.device(x, y),
                        self.device(x + w, y),
                        self.device(x + w, y + h),
                        self.device(x, y + h),
                    );
                    self.current = Some(rect.p0);
                    self.emit(GraphicsEvent::AppendRectangle(rect));
                })
                .is_some(),

            "S" => self.paint(&[GraphicsEvent::StrokePath]),
            "s" => self.paint(&[GraphicsEvent::ClosePath, GraphicsEvent::StrokePath]),
            "f" | "F" | "f*" => self.paint(&[GraphicsEvent::FillPath]),
            "B" | "B*" => self.paint(&[GraphicsEvent::FillStrokePath]),
            "b" | "b*" => self.paint(&[GraphicsEvent::ClosePath, GraphicsEvent::FillStrokePath]),
            "n" => self.paint(&[GraphicsEvent::EndPath]),
            "W" | "W*" => {
                self.emit(GraphicsEvent::Clip);
                true
            }
            "sh" => {
                self.emit(GraphicsEvent::ShadingFill);
                true
            }
            "Do" => match operands.first().and_then(|o| o.as_name().ok()) {
                Some(name) => {
                    self.draw_xobject(name);
                    true
                }
                None => false,
            },
            "BI" => {
                self.emit(GraphicsEvent::DrawImage {
                    name: INLINE_IMAGE.to_string(),
                });
                true
            }

            "BT" => {
                self.text.matrix = MATRIX_IDENTITY;
                self.text.line_matrix = MATRIX_IDENTITY;
                true
            }
            "ET" => true,
            "Tf" => operands
                .get(1)
                .and_then(number)
                .map(|size| self.text.font_size = size)
                .is_some(),
            "TL" => numbers::<1>(operands)
                .map(|[leading]| self.text.leading = leading)
                .is_some(),
            "Tm" => numbers::<6>(operands)
                .map(|m| {
                    self.text.matrix = as_matrix(m);
                    self.text.line_matrix = self.text.matrix;
                })
                .is_some(),
            "Td" => numbers::<2>(operands)
                .map(|[tx, ty]| self.text.next_line(tx, ty))
                .is_some(),
            "TD" => numbers::<2>(operands)
                .map(|[tx, ty]| {
                    self.text.leading = -ty;
                    self.text.next_line(tx, ty);
                })
                .is_some(),
            "T*" => {
                self.text.next_line(0.0, -self.text.leading);
                true
            }
            "Tj" => operands
                .first()
                .and_then(latin1)
                .map(|s| self.show_text(&s))
                .is_some(),
            "'" => operands
                .first()
                .and_then(latin1)
                .map(|s| {
                    self.text.next_line(0.0, -self.text.leading);
                    self.show_text(&s);
                })
                .is_some(),
            "\"" => operands
                .get(2)
                .and_then(latin1)
                .map(|s| {
                    self.text.next_line(0.0, -self.text.leading);
                    self.show_text(&s);
                })
                .is_some(),
            "TJ" => operands
                .first()
                .and_then(|o| o.as_array().ok())
                .map(|items| self.show_text_array(items))
                .is_some(),

            other => {
                trace!(operator = other, "ignoring operator");
                true
            }
        };
        if !handled {
            warn!(
                operator = op.operator.as_str(),
                operands = operands.len(),
                "skipping operator with malformed operands"
            );
        }
    }

    fn draw_xobject(&mut self, name: &[u8]) {
        let label = String::from_utf8_lossy(name).into_owned();
        let scope = self.forms.last().copied().flatten();
        match self.xobjects.xobject(scope, name) {
            Some(XObject::Image) => self.emit(GraphicsEvent::DrawImage { name: label }),
            Some(XObject::Form {
                id,
                matrix,
                operations,
            }) => {
                if self.forms.len() >= MAX_FORM_DEPTH || (id.is_some() && self.forms.contains(&id)) {
                    warn!(name = %label, depth = self.forms.len(), "not replaying nested form");
                    return;
                }
                trace!(name = %label, operations = operations.len(), "replaying form");
                let depth = self.stack.len();
                self.stack.push(self.ctm);
                self.ctm = mult_matrix(matrix, self.ctm);
                self.forms.push(id);
                for op in &operations {
                    self.execute(op);
                }
                self.forms.pop();
                // The form's own q/Q pairs may be unbalanced.
                self.stack.truncate(depth + 1);
                if let Some(ctm) = self.stack.pop() {
                    self.ctm = ctm;
                }
            }
            None => {
                warn!(name = %label, "unresolved XObject; treating it as an image");
                self.emit(GraphicsEvent::DrawImage { name: label });
            }
        }
    }

    fn curve(&mut self, c1: Point, c2: Point, end: Point) {
        self.current = Some(end);
        self.emit(GraphicsEvent::CurveTo { c1, c2, end });
    }

    fn paint(&mut self, events: &[GraphicsEvent]) -> bool {
        for event in events {
            self.emit(event.clone());
        }
        self.current = None;
        true
    }

    /// Text rendering matrix: text space through the CTM into page space.
    fn render_matrix(&self) -> Matrix {
        mult_matrix(self.text.matrix, self.ctm)
    }

    fn show_text(&mut self, s: &str) {
        let advance = s.chars().count() as f64 * self.text.font_size * GLYPH_ADVANCE;
        let trm = self.render_matrix();
        let (ox, oy) = apply_matrix_pt(trm, 0.0, 0.0);
        let (ex, _) = apply_matrix_pt(trm, advance, 0.0);
        let (_, _, c, d, _, _) = trm;
        let height = self.text.font_size * c.hypot(d);

        if !s.trim().is_empty() {
            self.emit(GraphicsEvent::ShowText {
                text: s.to_string(),
                matrix: trm,
            });
            self.page.push_glyph(Glyph::new(
                s,
                BBox {
                    x0: ox.min(ex),
                    top: oy - height,
                    x1: ox.max(ex),
                    bottom: oy,
                },
            ));
        }
        self.text.matrix = translate_matrix(self.text.matrix, advance, 0.0);
    }

    fn show_text_array(&mut self, items: &[Object]) {
        let mut run = String::new();
        for item in items {
            if let Some(s) = latin1(item) {
                run.push_str(&s);
            } else if let Some(adjust) = number(item) {
                let shift = -adjust / 1000.0 * self.text.font_size;
                // Large negative kerning separates words in exported tables.
                if shift > self.text.font_size * GLYPH_ADVANCE && !run.is_empty() {
                    self.show_text(&run);
                    run.clear();
                }
                self.text.matrix = translate_matrix(self.text.matrix, shift, 0.0);
            }
        }
        if !run.is_empty() {
            self.show_text(&run);
        }
    }
}

/// Interpret a decoded content stream into a recorded page.
pub fn replay_page(
    page_number: usize,
    media_box: [f64; 4],
    operations: &[Operation],
    xobjects: &dyn XObjectLookup,
) -> RecordedPage {
    let mut replay = PageReplay::new(page_number, media_box, xobjects);
    for op in operations {
        replay.execute(op);
    }
    if !replay.stack.is_empty() {
        debug!(
            page = page_number,
            depth = replay.stack.len(),
            "unbalanced graphics state at end of page"
        );
    }
    replay.page
}

/// Parse a page list such as `"1,3 4"` (1-indexed).
pub fn parse_page_numbers(list: &str) -> Result<Vec<usize>> {
    let mut seen = BTreeSet::new();
    for token in list
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
    {
        let n: usize = token
            .parse()
            .map_err(|_| anyhow!("invalid page number `{token}`"))?;
        if n == 0 {
            return Err(anyhow!("page numbers start at 1"));
        }
        seen.insert(n);
    }
    Ok(seen.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rostergrid_core::{GridError, TableExtractor};

    use super::*;

    const LETTER: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

    type XObjects = BTreeMap<Vec<u8>, XObject>;

    impl XObjectLookup for XObjects {
        fn xobject(&self, _form: Option<ObjectId>, name: &[u8]) -> Option<XObject> {
            self.get(name).cloned()
        }
    }

    fn replay(ops: &[Operation]) -> RecordedPage {
        replay_page(1, LETTER, ops, &XObjects::new())
    }

    fn name(n: &str) -> Object {
        Object::Name(n.as_bytes().to_vec())
    }

    fn segment(from: [i64; 2], to: [i64; 2]) -> [Operation; 3] {
        [
            op("m", ints(&from)),
            op("l", ints(&to)),
            op("S", vec![]),
        ]
    }

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn ints(values: &[i64]) -> Vec<Object> {
        values.iter().map(|&v| Object::Integer(v)).collect()
    }

    fn text_string(s: &str) -> Object {
        Object::string_literal(s)
    }

    #[test]
    fn path_points_are_flipped_to_top_left() {
        let ops = vec![
            op("m", ints(&[10, 700])),
            op("l", ints(&[110, 700])),
            op("S", vec![]),
        ];
        let page = replay(&ops);
        assert_eq!(page.height, 792.0);
        assert_eq!(
            page.events,
            vec![
                GraphicsEvent::MoveTo(Point::new(10.0, 92.0)),
                GraphicsEvent::LineTo(Point::new(110.0, 92.0)),
                GraphicsEvent::StrokePath,
            ]
        );
    }

    #[test]
    fn cm_is_scoped_by_save_restore() {
        let ops = vec![
            op("q", vec![]),
            op("cm", ints(&[1, 0, 0, 1, 50, 0])),
            op("m", ints(&[0, 792])),
            op("Q", vec![]),
            op("m", ints(&[0, 792])),
        ];
        let page = replay(&ops);
        assert_eq!(
            page.events,
            vec![
                GraphicsEvent::MoveTo(Point::new(50.0, 0.0)),
                GraphicsEvent::MoveTo(Point::new(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn rectangle_and_painting_operators() {
        let ops = vec![
            op("re", ints(&[0, 782, 20, 10])),
            op("b", vec![]),
            op("W", vec![]),
            op("n", vec![]),
        ];
        let page = replay(&ops);
        assert_eq!(
            page.events,
            vec![
                GraphicsEvent::AppendRectangle(Rectangle::new(
                    Point::new(0.0, 10.0),
                    Point::new(20.0, 10.0),
                    Point::new(20.0, 0.0),
                    Point::new(0.0, 0.0),
                )),
                GraphicsEvent::ClosePath,
                GraphicsEvent::FillStrokePath,
                GraphicsEvent::Clip,
                GraphicsEvent::EndPath,
            ]
        );
    }

    #[test]
    fn malformed_operands_are_skipped() {
        let ops = vec![op("m", ints(&[10])), op("l", vec![Object::Null, Object::Null])];
        assert!(replay(&ops).events.is_empty());
    }

    #[test]
    fn text_produces_glyph_runs() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(10)]),
            op("Td", ints(&[100, 700])),
            op("Tj", vec![text_string("Alice")]),
            op("TL", ints(&[12])),
            op("T*", vec![]),
            op("Tj", vec![text_string("Bob")]),
            op("ET", vec![]),
        ];
        let page = replay(&ops);
        assert_eq!(page.glyphs.len(), 2);

        let alice = &page.glyphs[0];
        assert_eq!(alice.text, "Alice");
        assert_eq!(alice.bbox.x0, 100.0);
        assert_eq!(alice.bbox.x1, 125.0);
        assert_eq!(alice.bbox.bottom, 92.0);
        assert_eq!(alice.bbox.top, 82.0);

        let bob = &page.glyphs[1];
        assert_eq!(bob.bbox.x0, 100.0);
        assert_eq!(bob.bbox.bottom, 104.0);
        assert!(matches!(page.events[0], GraphicsEvent::ShowText { .. }));
    }

    #[test]
    fn wide_kerning_splits_text_array() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(10)]),
            op(
                "TJ",
                vec![Object::Array(vec![
                    text_string("Mo"),
                    Object::Integer(-20),
                    text_string("n"),
                    Object::Integer(-3000),
                    text_string("Tue"),
                ])],
            ),
            op("ET", vec![]),
        ];
        let page = replay(&ops);
        let texts: Vec<&str> = page.glyphs.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(texts, vec!["Mon", "Tue"]);
    }

    #[test]
    fn image_xobjects_and_shadings_become_events() {
        let xobjects = XObjects::from([(b"Im1".to_vec(), XObject::Image)]);
        let ops = vec![op("sh", vec![name("Sh0")]), op("Do", vec![name("Im1")])];
        let page = replay_page(1, LETTER, &ops, &xobjects);
        assert_eq!(
            page.events,
            vec![
                GraphicsEvent::ShadingFill,
                GraphicsEvent::DrawImage {
                    name: "Im1".to_string()
                },
            ]
        );
        assert!(matches!(
            TableExtractor::default().extract_table(&page),
            Err(GridError::UnsupportedGraphicsOperation { .. })
        ));
    }

    #[test]
    fn inline_images_become_events() {
        let ops = vec![
            op("BI", vec![]),
            op("ID", vec![]),
            op("EI", vec![]),
        ];
        assert_eq!(
            replay(&ops).events,
            vec![GraphicsEvent::DrawImage {
                name: "inline".to_string()
            }]
        );
    }

    #[test]
    fn form_is_replayed_through_its_matrix() {
        let operations: Vec<Operation> = [
            segment([0, 0], [100, 0]),
            segment([0, 50], [100, 50]),
            segment([0, 100], [100, 100]),
            segment([0, 0], [0, 100]),
            segment([50, 0], [50, 100]),
            segment([100, 0], [100, 100]),
        ]
        .into_iter()
        .flatten()
        .collect();
        let form = XObject::Form {
            id: None,
            matrix: as_matrix([1.0, 0.0, 0.0, 1.0, 100.0, 600.0]),
            operations,
        };
        let xobjects = XObjects::from([(b"Fm0".to_vec(), form)]);
        let ops = vec![
            op("q", vec![]),
            op("Do", vec![name("Fm0")]),
            op("Q", vec![]),
            op("m", ints(&[0, 792])),
        ];
        let page = replay_page(1, LETTER, &ops, &xobjects);

        assert_eq!(page.events[0], GraphicsEvent::MoveTo(Point::new(100.0, 192.0)));
        assert_eq!(
            page.events.last(),
            Some(&GraphicsEvent::MoveTo(Point::new(0.0, 0.0)))
        );
        assert!(
            !page
                .events
                .iter()
                .any(|e| matches!(e, GraphicsEvent::DrawImage { .. }))
        );
        let table = TableExtractor::default().extract_table(&page).unwrap();
        assert_eq!(table.cell_count(), 4);
    }

    #[test]
    fn recursive_form_stops_at_depth_limit() {
        let form = XObject::Form {
            id: None,
            matrix: MATRIX_IDENTITY,
            operations: vec![op("Do", vec![name("Fm0")]), op("m", ints(&[0, 0]))],
        };
        let xobjects = XObjects::from([(b"Fm0".to_vec(), form)]);
        let page = replay_page(1, LETTER, &[op("Do", vec![name("Fm0")])], &xobjects);
        assert_eq!(page.events.len(), MAX_FORM_DEPTH);
    }

    #[test]
    fn page_numbers_accept_commas_and_spaces() {
        assert_eq!(parse_page_numbers("3, 1 2,2").unwrap(), vec![1, 2, 3]);
        assert!(parse_page_numbers("0").is_err());
        assert!(parse_page_numbers("x").is_err());
    }
}
