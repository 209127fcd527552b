//! Particle field behind the decorative animated gradient.
//!
//! Pure simulation: the host draws each particle as a radial gradient
//! fading from `opacity` to transparent over `size` pixels.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Density {
    Regular,
    /// For compact containers.
    Small,
}

impl Density {
    fn particle_count(self) -> usize {
        match self {
            Density::Regular => 30,
            Density::Small => 15,
        }
    }

    fn size_range(self) -> (f64, f64) {
        match self {
            Density::Regular => (80.0, 150.0),
            Density::Small => (40.0, 80.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub opacity: f64,
}

#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, density: Density, width: f64, height: f64) -> Self {
        let (min_size, max_size) = density.size_range();
        let particles = (0..density.particle_count())
            .map(|_| Particle {
                x: rng.gen::<f64>() * width,
                y: rng.gen::<f64>() * height,
                size: min_size + rng.gen::<f64>() * (max_size - min_size),
                speed_x: (rng.gen::<f64>() - 0.5) * 0.3,
                speed_y: (rng.gen::<f64>() - 0.5) * 0.3,
                opacity: 0.1 + rng.gen::<f64>() * 0.2,
            })
            .collect();
        Self {
            particles,
            width,
            height,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Advances one frame, bouncing off the edges.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.x += p.speed_x;
            p.y += p.speed_y;
            if p.x < 0.0 || p.x > self.width {
                p.speed_x = -p.speed_x;
            }
            if p.y < 0.0 || p.y > self.height {
                p.speed_y = -p.speed_y;
            }
        }
    }

    /// New canvas bounds; particles left outside are pulled back in.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        for p in &mut self.particles {
            p.x = p.x.clamp(0.0, self.width);
            p.y = p.y.clamp(0.0, self.height);
        }
    }
}

/// Keeps `slot` in step with the measured canvas size.
///
/// Nothing is built while the canvas has no layout size, so a field is
/// never seeded into a 0x0 box. Returns the field to draw, if any.
pub fn sync_field<'a, R: Rng + ?Sized>(
    slot: &'a mut Option<ParticleField>,
    rng: &mut R,
    density: Density,
    width: f64,
    height: f64,
) -> Option<&'a mut ParticleField> {
    if width <= 0.0 || height <= 0.0 {
        return slot.as_mut();
    }
    match slot.as_mut() {
        Some(field) => {
            if field.width != width || field.height != height {
                field.resize(width, height);
            }
        }
        None => *slot = Some(ParticleField::new(rng, density, width, height)),
    }
    slot.as_mut()
}

/// Parses a CSS custom property such as `262.1 83.3% 57.8%` into RGB.
pub fn hsl_to_rgb(hsl: &str) -> Option<[u8; 3]> {
    let mut parts = hsl.split_whitespace().map(|p| p.trim_end_matches('%').parse::<f64>());
    let h = parts.next()?.ok()? / 360.0;
    let s = parts.next()?.ok()? / 100.0;
    let l = parts.next()?.ok()? / 100.0;

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    Some([to_byte(r), to_byte(g), to_byte(b)])
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// CSS colour for a gradient stop.
pub fn rgba(rgb: [u8; 3], alpha: f64) -> String {
    format!("rgba({}, {}, {}, {})", rgb[0], rgb[1], rgb[2], alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_density_shapes_field() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = ParticleField::new(&mut rng, Density::Small, 300.0, 200.0);
        assert_eq!(field.particles().len(), 15);
        for p in field.particles() {
            assert!((40.0..=80.0).contains(&p.size));
            assert!((0.1..=0.3).contains(&p.opacity));
            assert!(p.speed_x.abs() <= 0.15);
        }
    }

    #[test]
    fn test_particles_bounce_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut field = ParticleField::new(&mut rng, Density::Regular, 120.0, 80.0);
        for _ in 0..5_000 {
            field.step();
        }
        for p in field.particles() {
            assert!(p.x >= -0.5 && p.x <= 120.5, "x = {}", p.x);
            assert!(p.y >= -0.5 && p.y <= 80.5, "y = {}", p.y);
        }
    }

    #[test]
    fn test_resize_pulls_particles_in() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = ParticleField::new(&mut rng, Density::Regular, 1000.0, 1000.0);
        field.resize(10.0, 10.0);
        assert!(field.particles().iter().all(|p| p.x <= 10.0 && p.y <= 10.0));
    }

    #[test]
    fn test_field_waits_for_layout_size() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut slot = None;
        assert!(sync_field(&mut slot, &mut rng, Density::Regular, 0.0, 0.0).is_none());
        assert!(sync_field(&mut slot, &mut rng, Density::Regular, 640.0, 0.0).is_none());

        let field = sync_field(&mut slot, &mut rng, Density::Regular, 640.0, 360.0).unwrap();
        assert_eq!((field.width(), field.height()), (640.0, 360.0));
        assert_eq!(field.particles().len(), 30);
        assert!(field.particles().iter().any(|p| p.x > 1.0 && p.y > 1.0));
    }

    #[test]
    fn test_field_follows_canvas_size() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut slot = None;
        sync_field(&mut slot, &mut rng, Density::Small, 800.0, 600.0);
        let seeded = slot.as_ref().unwrap().particles().to_vec();

        // Unchanged size keeps the same particles.
        sync_field(&mut slot, &mut rng, Density::Small, 800.0, 600.0);
        assert_eq!(slot.as_ref().unwrap().particles(), seeded.as_slice());

        let field = sync_field(&mut slot, &mut rng, Density::Small, 200.0, 100.0).unwrap();
        assert_eq!((field.width(), field.height()), (200.0, 100.0));
        assert!(field.particles().iter().all(|p| p.x <= 200.0 && p.y <= 100.0));

        // A collapsed canvas keeps the last field rather than a degenerate one.
        let field = sync_field(&mut slot, &mut rng, Density::Small, 0.0, 0.0).unwrap();
        assert_eq!(field.width(), 200.0);
    }

    #[test]
    fn test_hsl_to_rgb() {
        assert_eq!(hsl_to_rgb("0 0% 100%"), Some([255, 255, 255]));
        assert_eq!(hsl_to_rgb("0 100% 50%"), Some([255, 0, 0]));
        assert_eq!(hsl_to_rgb("262.1 83.3% 57.8%"), Some([124, 58, 237]));
        assert_eq!(hsl_to_rgb("not a colour"), None);
        assert_eq!(hsl_to_rgb(""), None);
    }

    #[test]
    fn test_rgba() {
        assert_eq!(rgba([1, 2, 3], 0.5), "rgba(1, 2, 3, 0.5)");
    }
}
