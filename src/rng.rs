/// Seed a fast WASM-native generator once from the platform RNG, so per-frame
/// sampling avoids the JS interop cost of `Math.random`.
pub fn new_rng() -> fastrand::Rng {
    #[cfg(target_arch = "wasm32")]
    {
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        fastrand::Rng::with_seed(seed.max(1))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        fastrand::Rng::new()
    }
}

/// Uniform sample in `[min, min + span)`.
pub fn in_span(rng: &mut fastrand::Rng, min: f64, span: f64) -> f64 {
    min + rng.f64() * span
}

/// Uniform sample in `[-half, half)`.
pub fn centered(rng: &mut fastrand::Rng, half: f64) -> f64 {
    (rng.f64() - 0.5) * 2.0 * half
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_stays_in_half_open_range() {
        let mut rng = new_rng();
        for _ in 0..1000 {
            let v = centered(&mut rng, 0.1);
            assert!((-0.1..0.1).contains(&v), "got {}", v);
        }
    }
}
