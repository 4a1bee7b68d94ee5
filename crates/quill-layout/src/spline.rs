//! Natural cubic spline interpolation of stroke control points
//!
//! x(t) and y(t) are fitted separately over uniform knots `t_i = i/(n-1)`
//! with zero second derivative at both ends, then sampled at evenly spaced
//! `t` in `[0, 1]`.

use kurbo::Point;

/// One axis of a natural cubic spline over uniform knots on `[0, 1]`
#[derive(Debug, Clone)]
struct AxisSpline {
    step: f64,
    values: Vec<f64>,
    /// Second derivatives at the knots
    curvature: Vec<f64>,
}

impl AxisSpline {
    /// Needs at least two values
    fn new(values: Vec<f64>) -> Self {
        let n = values.len();
        let step = 1.0 / (n - 1) as f64;
        let mut curvature = vec![0.0; n];

        if n > 2 {
            // Interior equations: M[i-1] + 4 M[i] + M[i+1] = 6/h² (y[i+1] - 2y[i] + y[i-1])
            let inner = n - 2;
            let scale = 6.0 / (step * step);
            let mut diag = vec![4.0; inner];
            let mut rhs: Vec<f64> = (1..n - 1)
                .map(|i| scale * (values[i + 1] - 2.0 * values[i] + values[i - 1]))
                .collect();

            // Thomas algorithm, off-diagonals are all 1
            for i in 1..inner {
                let factor = 1.0 / diag[i - 1];
                diag[i] -= factor;
                rhs[i] -= factor * rhs[i - 1];
            }
            curvature[inner] = rhs[inner - 1] / diag[inner - 1];
            for i in (0..inner - 1).rev() {
                curvature[i + 1] = (rhs[i] - curvature[i + 2]) / diag[i];
            }
        }

        Self {
            step,
            values,
            curvature,
        }
    }

    fn at(&self, t: f64) -> f64 {
        let h = self.step;
        let last_segment = self.values.len() - 2;
        let segment = ((t / h).floor().max(0.0) as usize).min(last_segment);

        let t0 = segment as f64 * h;
        let a = t0 + h - t;
        let b = t - t0;
        let (m0, m1) = (self.curvature[segment], self.curvature[segment + 1]);
        let (y0, y1) = (self.values[segment], self.values[segment + 1]);

        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 - m0 * h * h / 6.0) * a / h
            + (y1 - m1 * h * h / 6.0) * b / h
    }
}

/// Dense smooth curve through `points`.
///
/// One point comes back unchanged, an empty slice gives an empty curve.
/// Otherwise `sample_count` (at least 2) samples are returned and the first
/// and last equal the end control points exactly.
pub fn interpolate(points: &[Point], sample_count: usize) -> Vec<Point> {
    match points {
        [] => Vec::new(),
        [single] => vec![*single],
        [first, .., last] => {
            let samples = sample_count.max(2);
            let xs = AxisSpline::new(points.iter().map(|p| p.x).collect());
            let ys = AxisSpline::new(points.iter().map(|p| p.y).collect());

            let mut curve: Vec<Point> = (0..samples)
                .map(|i| {
                    let t = i as f64 / (samples - 1) as f64;
                    Point::new(xs.at(t), ys.at(t))
                })
                .collect();
            curve[0] = *first;
            curve[samples - 1] = *last;
            curve
        },
    }
}
