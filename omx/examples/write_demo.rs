//! Write a small skim container and read it back

use omx::{
    MatrixCollection, MatrixData, MatrixOptions, OmxFile, OmxResult, OpenMode, Predicate,
};
use rand::Rng;
use std::time::Instant;

const ZONES: usize = 25;

fn main() -> OmxResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let filename = "example_skims.omx";
    let mut rng = rand::thread_rng();

    println!("Writing {ZONES}x{ZONES} skims to '{filename}'...");
    let start = Instant::now();
    {
        let mut file = OmxFile::open(filename, OpenMode::WriteCreate, Some((ZONES, ZONES).into()))?;

        for (period, scale) in [("am", 1.2), ("md", 1.0), ("pm", 1.3)] {
            let times: Vec<f64> = (0..ZONES * ZONES)
                .map(|i| {
                    let (o, d) = (i / ZONES, i % ZONES);
                    let base = (o as f64 - d as f64).abs() * 2.5;
                    base * scale + rng.gen_range(0.0..1.0)
                })
                .collect();
            let options = MatrixOptions::new()
                .with_title(format!("{period} highway time"))
                .with_attribute("timeperiod", period)
                .with_attribute("mode", "hwy");
            file.create_matrix(
                &format!("time_hwy_{period}"),
                MatrixData::new((ZONES, ZONES), times)?,
                options,
            )?;
        }

        let trips = MatrixData::filled((ZONES, ZONES), 1i32)?;
        file.set("trips", trips)?;
        file.set_matrix_attribute("trips", "year", 2010i64)?;

        let taz: Vec<u32> = (1..=ZONES as u32).map(|z| z * 100).collect();
        file.create_mapping("taz", taz, false)?;
        file.close()?;
    }
    println!("Written in {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);

    println!("\nReading back...");
    let mut file = OmxFile::open(filename, OpenMode::Read, None)?;
    print!("{}", file.summary()?);

    let am = file.query(&Predicate::new().with("timeperiod", "am"))?;
    println!("\nMatrices with timeperiod=am: {}", am.len());

    let taz = file.mapping("taz")?;
    if let (Some(&o), Some(&d)) = (taz.get(&300), taz.get(&1200)) {
        let time = file.get("time_hwy_am")?.value(o, d);
        println!("AM highway time 300 -> 1200: {time:?}");
    }

    file.close()
}
