use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use rostergrid_core::TableExtractor;
use rostergrid_core::interp::{Glyph, GraphicsEvent, RecordedPage};
use rostergrid_core::table::{BBox, Point};

const CELL_WIDTH: f64 = 60.0;
const CELL_HEIGHT: f64 = 14.0;

/// A `rows` x `columns` ruled grid with one glyph run per cell.
fn synthetic_roster(rows: usize, columns: usize) -> RecordedPage {
    let width = columns as f64 * CELL_WIDTH;
    let height = rows as f64 * CELL_HEIGHT;
    let mut page = RecordedPage::new(1, width, height);

    let mut stroke = |x0: f64, y0: f64, x1: f64, y1: f64| {
        page.push_event(GraphicsEvent::MoveTo(Point::new(x0, y0)));
        page.push_event(GraphicsEvent::LineTo(Point::new(x1, y1)));
        page.push_event(GraphicsEvent::StrokePath);
    };
    for r in 0..=rows {
        let y = r as f64 * CELL_HEIGHT;
        stroke(0.0, y, width, y);
    }
    for c in 0..=columns {
        let x = c as f64 * CELL_WIDTH;
        stroke(x, 0.0, x, height);
    }

    for r in 0..rows {
        for c in 0..columns {
            let x0 = c as f64 * CELL_WIDTH + 4.0;
            let top = r as f64 * CELL_HEIGHT + 3.0;
            page.push_glyph(Glyph::new(
                format!("r{r}c{c}"),
                BBox {
                    x0,
                    top,
                    x1: x0 + 24.0,
                    bottom: top + 8.0,
                },
            ));
        }
    }
    page
}

fn bench_extract_table(c: &mut Criterion) {
    let extractor = TableExtractor::default();
    let mut group = c.benchmark_group("table_extract");
    group.sample_size(20);

    for (rows, columns) in [(10, 5), (30, 10)] {
        let page = synthetic_roster(rows, columns);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{columns}")),
            &page,
            |b, page| {
                b.iter(|| {
                    let table = extractor.extract_table(black_box(page)).expect("extract");
                    black_box(table.cell_count())
                })
            },
        );
    }
    group.finish();
}

fn bench_extract_tables_parallel(c: &mut Criterion) {
    let extractor = TableExtractor::default();
    let pages: Vec<RecordedPage> = (0..8).map(|_| synthetic_roster(30, 10)).collect();

    c.bench_function("table_extract_tables_8_pages", |b| {
        b.iter(|| {
            let results = extractor.extract_tables(black_box(&pages));
            black_box(results.iter().filter(|r| r.is_ok()).count())
        })
    });
}

criterion_group!(benches, bench_extract_table, bench_extract_tables_parallel);
criterion_main!(benches);
