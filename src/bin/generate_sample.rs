use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;

/// Steps written per chain; the default burn-in cut keeps the second half.
const NUM_STEPS: i64 = 200_000;

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// AR(1) walk around `mean` with stationary spread `sd` and lag-1
/// correlation `rho`; higher `rho` mimics a slowly mixing sampler.
fn ar1_chain(rng: &mut SimpleRng, n: usize, mean: f64, sd: f64, rho: f64) -> Vec<f64> {
    let innovation = sd * (1.0 - rho * rho).sqrt();
    let mut x = mean;
    (0..n)
        .map(|_| {
            x = mean + rho * (x - mean) + rng.gauss(0.0, innovation);
            x
        })
        .collect()
}

fn write_chain(path: &Path, seed: u64, rho: f64) -> Result<()> {
    let mut rng = SimpleRng::new(seed);
    let n = NUM_STEPS as usize;

    let theta = ar1_chain(&mut rng, n, 1.5, 0.4, rho);
    let log_sigma = ar1_chain(&mut rng, n, -0.5, 0.2, rho);
    let sigma: Vec<f64> = log_sigma.iter().map(|v| v.exp()).collect();
    let log_likelihood: Vec<f64> = theta
        .iter()
        .zip(sigma.iter())
        .map(|(t, s)| -0.5 * ((t - 1.5) / s).powi(2) - s.ln())
        .collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("step", DataType::Int64, false),
        Field::new("theta", DataType::Float64, false),
        Field::new("sigma", DataType::Float64, false),
        Field::new("log_likelihood", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(0..NUM_STEPS)),
            Arc::new(Float64Array::from(theta)),
            Arc::new(Float64Array::from(sigma)),
            Arc::new(Float64Array::from(log_likelihood)),
        ],
    )
    .context("building record batch")?;

    let props = WriterProperties::builder()
        .set_key_value_metadata(Some(vec![KeyValue::new(
            "table".to_string(),
            "posteriors".to_string(),
        )]))
        .build();

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props)).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    for (name, seed, rho) in [("chain_a.parquet", 42, 0.5), ("chain_b.parquet", 7, 0.95)] {
        let path = out_dir.join(name);
        write_chain(&path, seed, rho)?;
        println!("Wrote {NUM_STEPS} steps (lag-1 correlation {rho}) to {}", path.display());
    }
    Ok(())
}
