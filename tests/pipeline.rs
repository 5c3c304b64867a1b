use bzip2::write::BzEncoder;
use bzip2::Compression;
use fars_map::charts::StateMap;
use fars_map::{
    build_filename, load_records, plot_state, summarize, FarsDataset, FarsError, MapSink,
    PlotOutcome,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

const HEADER: &str = "STATE,ST_CASE,VE_TOTAL,MONTH,DAY,YEAR,LATITUDE,LONGITUD";

#[derive(Default)]
struct Collect {
    maps: Vec<StateMap>,
}

impl MapSink for Collect {
    fn render(&mut self, map: &StateMap) -> fars_map::Result<()> {
        self.maps.push(map.clone());
        Ok(())
    }
}

/// Counts WARN events seen by the subscriber.
struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn write_year(dir: &Path, year: i32, rows: &[(u8, u8, f64, f64)]) {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for (i, (state, month, lat, lon)) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},1,{},1,{},{},{}\n",
            state,
            u32::from(*state) * 10000 + i as u32,
            month,
            year,
            lat,
            lon
        ));
    }
    let file = File::create(dir.join(build_filename(year))).unwrap();
    let mut enc = BzEncoder::new(file, Compression::default());
    enc.write_all(csv.as_bytes()).unwrap();
    enc.finish().unwrap();
}

fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    write_year(
        dir.path(),
        2013,
        &[
            (1, 1, 33.5, -86.6),
            (1, 1, 32.1, -87.2),
            (4, 2, 33.4, -112.0),
            (1, 12, 99.9999, 999.9999),
        ],
    );
    write_year(
        dir.path(),
        2014,
        &[(1, 2, 31.4, -85.9), (6, 2, 34.0, -118.2), (6, 3, 37.7, -122.4)],
    );
    write_year(dir.path(), 2015, &[(1, 1, 34.7, -86.5)]);
    dir
}

#[test]
fn summary_counts_every_loaded_row() {
    let dir = fixture();
    let ds = FarsDataset::new(dir.path());

    let pivot = summarize(&ds, &[2015, 2013, 2014]).unwrap();

    assert_eq!(pivot.years, vec![2013, 2014, 2015]);
    let months: Vec<u8> = pivot.rows.iter().map(|r| r.month).collect();
    assert_eq!(months, vec![1, 2, 3, 12]);
    assert_eq!(pivot.count(2013, 1), Some(2));
    assert_eq!(pivot.count(2013, 2), Some(1));
    assert_eq!(pivot.count(2014, 2), Some(2));
    assert_eq!(pivot.count(2014, 1), None);
    assert_eq!(pivot.count(2015, 1), Some(1));
    assert_eq!(pivot.total(), 8);
    assert!(pivot.skipped_years.is_empty());
}

#[test]
fn summary_isolates_missing_years() {
    let dir = fixture();
    let ds = FarsDataset::new(dir.path());

    let pivot = summarize(&ds, &[2013, 1999, 2014, 2001]).unwrap();

    assert_eq!(pivot.years, vec![2013, 2014]);
    assert_eq!(pivot.skipped_years, vec![1999, 2001]);
    assert_eq!(pivot.total(), 7);
}

#[test]
fn summary_warns_once_per_invalid_year() {
    let dir = fixture();
    std::fs::write(dir.path().join(build_filename(2016)), "not bz2").unwrap();
    let ds = FarsDataset::new(dir.path());
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));

    let pivot = tracing::subscriber::with_default(subscriber, || {
        summarize(&ds, &[2013, 1999, 2014, 2016, 2001]).unwrap()
    });

    assert_eq!(pivot.skipped_years, vec![1999, 2016, 2001]);
    assert_eq!(warnings.load(Ordering::SeqCst), 3);
}

#[test]
fn summary_of_good_years_does_not_warn() {
    let dir = fixture();
    let ds = FarsDataset::new(dir.path());
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));

    tracing::subscriber::with_default(subscriber, || summarize(&ds, &[2013, 2014]).unwrap());

    assert_eq!(warnings.load(Ordering::SeqCst), 0);
}

#[test]
fn summary_of_only_bad_years_is_empty() {
    let dir = tempdir().unwrap();
    let pivot = summarize(&FarsDataset::new(dir.path()), &[2000, 2001]).unwrap();
    assert!(pivot.is_empty());
    assert_eq!(pivot.skipped_years, vec![2000, 2001]);
}

#[test]
fn plot_renders_only_valid_points_of_the_state() {
    let dir = fixture();
    let ds = FarsDataset::new(dir.path());
    let mut sink = Collect::default();

    let outcome = plot_state(&ds, 1, 2013, &mut sink).unwrap();

    assert_eq!(outcome, PlotOutcome::Rendered { points: 2 });
    assert_eq!(sink.maps.len(), 1);
    let map = &sink.maps[0];
    assert_eq!((map.state, map.year), (1, 2013));
    assert_eq!(map.bounds.min_latitude, 32.1);
    assert_eq!(map.bounds.max_latitude, 33.5);
    assert_eq!(map.bounds.min_longitude, -87.2);
    assert_eq!(map.bounds.max_longitude, -86.6);
}

#[test]
fn plot_rejects_state_absent_from_year() {
    let dir = fixture();
    let ds = FarsDataset::new(dir.path());
    let mut sink = Collect::default();

    let err = plot_state(&ds, 6, 2013, &mut sink).unwrap_err();

    assert!(matches!(err, FarsError::InvalidState { state: 6, year: 2013 }));
    assert!(sink.maps.is_empty());
}

#[test]
fn plot_of_state_with_only_sentinel_points_draws_nothing() {
    let dir = tempdir().unwrap();
    write_year(
        dir.path(),
        2016,
        &[(2, 4, 99.9999, 999.9999), (1, 4, 33.5, -86.6)],
    );
    let mut sink = Collect::default();

    let outcome = plot_state(&FarsDataset::new(dir.path()), 2, 2016, &mut sink).unwrap();

    assert_eq!(outcome, PlotOutcome::NoAccidents);
    assert!(sink.maps.is_empty());
}

#[test]
fn plot_of_missing_year_is_file_not_found() {
    let dir = tempdir().unwrap();
    let mut sink = Collect::default();

    let err = plot_state(&FarsDataset::new(dir.path()), 1, 2020, &mut sink).unwrap_err();

    assert!(matches!(err, FarsError::FileNotFound { .. }));
    assert!(err.to_string().contains("accident_2020.csv.bz2"));
}

#[test]
fn load_records_keeps_uninspected_columns() {
    let dir = fixture();
    let table = load_records(dir.path().join("accident_2014.csv.bz2")).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.dataframe().width(), 8);
    assert!(table.column_names().iter().any(|c| c == "VE_TOTAL"));
}
