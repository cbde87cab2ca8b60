use std::sync::Arc;

use anyhow::Context;
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const HEADERS: [&str; 9] = [
    "show_id",
    "type",
    "title",
    "director",
    "cast",
    "country",
    "release_year",
    "rating",
    "listed_in",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next_u64() % 100 < percent
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// 1..=max distinct picks joined with ", ", sometimes with stray spaces.
    fn pick_list(&mut self, items: &[&str], max: usize) -> String {
        let n = 1 + self.below(max);
        let mut chosen: Vec<&str> = Vec::with_capacity(n);
        while chosen.len() < n.min(items.len()) {
            let item = self.pick(items);
            if !chosen.contains(&item) {
                chosen.push(item);
            }
        }
        let sep = if self.chance(10) { " ,  " } else { ", " };
        chosen.join(sep)
    }
}

type Row = [Option<String>; 9];

fn generate_rows(n: usize, rng: &mut SimpleRng) -> Vec<Row> {
    let types = ["Movie", "Movie", "Movie", "TV Show", "TV Show"];
    let countries = [
        "United States", "India", "United Kingdom", "Japan", "South Korea",
        "France", "Spain", "Mexico", "Brazil", "Nigeria",
    ];
    let movie_genres = [
        "Dramas", "Comedies", "Documentaries", "Action & Adventure",
        "International Movies", "Thrillers", "Horror Movies", "Children & Family Movies",
    ];
    let tv_genres = [
        "TV Dramas", "TV Comedies", "Docuseries", "Kids' TV",
        "International TV Shows", "Crime TV Shows", "Reality TV",
    ];
    let first = ["Ana", "Kenji", "Priya", "Liam", "Sofia", "Tunde", "Mina", "Diego", "Chloe", "Arjun"];
    let last = ["Santos", "Tanaka", "Sharma", "Walsh", "Rossi", "Okafor", "Park", "Lopez", "Martin", "Rao"];
    let words = ["Midnight", "River", "Echoes", "Lost", "Garden", "Signal", "Crown", "Winter", "Harbor", "Glass"];
    let ratings = ["TV-MA", "TV-14", "PG-13", "R", "TV-PG"];

    let people: Vec<String> = first
        .iter()
        .flat_map(|f| last.iter().map(move |l| format!("{f} {l}")))
        .collect();
    let people: Vec<&str> = people.iter().map(String::as_str).collect();

    (0..n)
        .map(|i| {
            let kind = rng.pick(&types);
            let genres = if kind == "Movie" { &movie_genres[..] } else { &tv_genres[..] };

            let country = match rng.below(20) {
                0 => None,
                1 => Some(format!(", {}", rng.pick(&countries))),
                2..=5 => Some(rng.pick_list(&countries, 3)),
                _ => Some(rng.pick(&countries).to_string()),
            };
            let director = (kind == "Movie" && rng.chance(85)).then(|| rng.pick_list(&people[..40], 2));
            let cast = rng.chance(90).then(|| rng.pick_list(&people, 6));
            let release_year = match rng.below(50) {
                0 => Some("unknown".to_string()),
                1 => None,
                _ => Some((1980 + rng.below(45)).to_string()),
            };
            let title = format!("{} {} {}", rng.pick(&words), rng.pick(&words), i);

            [
                Some(format!("s{}", i + 1)),
                Some(kind.to_string()),
                Some(title),
                director,
                cast,
                country,
                release_year,
                Some(rng.pick(&ratings).to_string()),
                rng.chance(97).then(|| rng.pick_list(genres, 3)),
            ]
        })
        .collect()
}

fn write_csv(path: &str, rows: &[Row]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    wtr.write_record(HEADERS)?;
    for row in rows {
        wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> anyhow::Result<()> {
    let year_idx = 6;
    let fields: Vec<Field> = HEADERS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let dtype = if i == year_idx { DataType::Int64 } else { DataType::Utf8 };
            Field::new(*name, dtype, true)
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let columns: Vec<ArrayRef> = (0..HEADERS.len())
        .map(|i| -> ArrayRef {
            if i == year_idx {
                // Unparsable years become nulls in a typed column.
                Arc::new(Int64Array::from(
                    rows.iter()
                        .map(|r| r[i].as_deref().and_then(|y| y.parse::<i64>().ok()))
                        .collect::<Vec<_>>(),
                ))
            } else {
                Arc::new(StringArray::from(
                    rows.iter().map(|r| r[i].as_deref()).collect::<Vec<_>>(),
                ))
            }
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(2_000, &mut rng);

    write_csv("sample_catalog.csv", &rows)?;
    write_parquet("sample_catalog.parquet", &rows)?;

    println!(
        "Wrote {} titles to sample_catalog.csv and sample_catalog.parquet",
        rows.len()
    );
    Ok(())
}
