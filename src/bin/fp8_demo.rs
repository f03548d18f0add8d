use failure::Error;
use fp8::Matrix2;

/// Multiplies two sample 2x2 matrices in the packed FP8 domain and logs the
/// decoded result row by row. The sample magnitudes sit above 2, so the
/// output demonstrates the encoder's exponent-overflow behavior rather than
/// anything numerically meaningful.
fn main() -> Result<(), Error> {
    femme::start(log::LevelFilter::Info)?;

    let a = Matrix2::encode([[3.75, -4.0], [4.25, 3.5]]);
    let b = Matrix2::encode([[-3.5, 4.1], [3.75, -3.6]]);
    let c = a.multiply(&b);

    log::info!("result matrix:");
    for row in c.decode().iter() {
        log::info!("{:?}", row);
    }
    Ok(())
}
