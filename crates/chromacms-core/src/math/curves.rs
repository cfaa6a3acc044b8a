//! ICC parametric curve families
//!
//! The 'para' tag type defines five function families (types 0-4),
//! from a pure power function up to the full five-segment sRGB-style
//! formula. See ICC.1:2022 Section 10.18.

/// ICC parametric curve function family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParametricCurveType {
    /// Type 0: Y = X^g
    Gamma,
    /// Type 1: Y = (aX + b)^g  if X >= -b/a, else 0
    Cie122,
    /// Type 2: Y = (aX + b)^g + c  if X >= -b/a, else c
    Iec61966_3,
    /// Type 3: Y = (aX + b)^g  if X >= d, else cX (sRGB-like)
    Iec61966_2_1,
    /// Type 4: Y = (aX + b)^g + e  if X >= d, else cX + f
    Full,
}

impl ParametricCurveType {
    /// Map an ICC function type code, None for unknown codes
    pub fn from_icc(function_type: u16) -> Option<Self> {
        match function_type {
            0 => Some(Self::Gamma),
            1 => Some(Self::Cie122),
            2 => Some(Self::Iec61966_3),
            3 => Some(Self::Iec61966_2_1),
            4 => Some(Self::Full),
            _ => None,
        }
    }

    /// Number of s15Fixed16 parameters the family carries
    pub fn param_count(&self) -> usize {
        match self {
            Self::Gamma => 1,
            Self::Cie122 => 3,
            Self::Iec61966_3 => 4,
            Self::Iec61966_2_1 => 5,
            Self::Full => 7,
        }
    }

    /// The wire function type code
    pub fn to_icc(&self) -> u16 {
        match self {
            Self::Gamma => 0,
            Self::Cie122 => 1,
            Self::Iec61966_3 => 2,
            Self::Iec61966_2_1 => 3,
            Self::Full => 4,
        }
    }
}

/// A parametric curve with its family and parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricCurve {
    pub curve_type: ParametricCurveType,
    pub g: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl ParametricCurve {
    /// A simple power curve (type 0)
    pub fn gamma(g: f64) -> Self {
        Self {
            curve_type: ParametricCurveType::Gamma,
            g,
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// The IEC 61966-2-1 sRGB transfer function (type 3)
    pub fn srgb() -> Self {
        Self {
            curve_type: ParametricCurveType::Iec61966_2_1,
            g: 2.4,
            a: 1.0 / 1.055,
            b: 0.055 / 1.055,
            c: 1.0 / 12.92,
            d: 0.04045,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Build from a family and its wire parameters, None if short
    pub fn from_params(curve_type: ParametricCurveType, params: &[f64]) -> Option<Self> {
        if params.len() < curve_type.param_count() {
            return None;
        }

        let mut curve = Self {
            curve_type,
            g: params[0],
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            f: 0.0,
        };

        match curve_type {
            ParametricCurveType::Gamma => {}
            ParametricCurveType::Cie122 => {
                curve.a = params[1];
                curve.b = params[2];
            }
            ParametricCurveType::Iec61966_3 => {
                curve.a = params[1];
                curve.b = params[2];
                curve.c = params[3];
            }
            ParametricCurveType::Iec61966_2_1 => {
                curve.a = params[1];
                curve.b = params[2];
                curve.c = params[3];
                curve.d = params[4];
            }
            ParametricCurveType::Full => {
                curve.a = params[1];
                curve.b = params[2];
                curve.c = params[3];
                curve.d = params[4];
                curve.e = params[5];
                curve.f = params[6];
            }
        }

        Some(curve)
    }

    /// Evaluate forward (encoded → linear), input clamped to [0, 1]
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);

        match self.curve_type {
            ParametricCurveType::Gamma => x.powf(self.g),
            ParametricCurveType::Cie122 => {
                let threshold = if self.a.abs() > 1e-10 {
                    -self.b / self.a
                } else {
                    0.0
                };
                if x >= threshold {
                    (self.a * x + self.b).max(0.0).powf(self.g)
                } else {
                    0.0
                }
            }
            ParametricCurveType::Iec61966_3 => {
                let threshold = if self.a.abs() > 1e-10 {
                    -self.b / self.a
                } else {
                    0.0
                };
                if x >= threshold {
                    (self.a * x + self.b).max(0.0).powf(self.g) + self.c
                } else {
                    self.c
                }
            }
            ParametricCurveType::Iec61966_2_1 => {
                if x >= self.d {
                    (self.a * x + self.b).max(0.0).powf(self.g)
                } else {
                    self.c * x
                }
            }
            ParametricCurveType::Full => {
                if x >= self.d {
                    (self.a * x + self.b).max(0.0).powf(self.g) + self.e
                } else {
                    self.c * x + self.f
                }
            }
        }
    }

    /// Evaluate inverse (linear → encoded)
    ///
    /// Types 0 and 3 invert in closed form; the other families use a
    /// few Newton-Raphson steps from a power-law starting guess.
    pub fn eval_inverse(&self, y: f64) -> f64 {
        let y = y.clamp(0.0, 1.0);

        match self.curve_type {
            ParametricCurveType::Gamma => {
                if self.g.abs() > 1e-10 {
                    y.powf(1.0 / self.g)
                } else {
                    y
                }
            }
            ParametricCurveType::Iec61966_2_1 => {
                let linear_threshold = self.c * self.d;
                if y < linear_threshold {
                    if self.c.abs() > 1e-10 {
                        y / self.c
                    } else {
                        0.0
                    }
                } else if self.a.abs() > 1e-10 && self.g.abs() > 1e-10 {
                    (y.powf(1.0 / self.g) - self.b) / self.a
                } else {
                    y
                }
            }
            _ => {
                let mut x = if self.g.abs() > 1e-10 {
                    y.powf(1.0 / self.g)
                } else {
                    y
                };

                for _ in 0..8 {
                    let fx = self.eval(x) - y;
                    if fx.abs() < 1e-12 {
                        break;
                    }
                    let h = 1e-8;
                    let dfx = (self.eval(x + h) - self.eval(x - h)) / (2.0 * h);
                    if dfx.abs() > 1e-10 {
                        x = (x - fx / dfx).clamp(0.0, 1.0);
                    }
                }
                x
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_gamma_eval() {
        let curve = ParametricCurve::gamma(2.2);
        assert!((curve.eval(0.5) - 0.5_f64.powf(2.2)).abs() < EPSILON);
        assert!((curve.eval(0.0) - 0.0).abs() < EPSILON);
        assert!((curve.eval(1.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_srgb_matches_reference() {
        let curve = ParametricCurve::srgb();
        for i in 0..=255 {
            let x = i as f64 / 255.0;
            let reference = if x <= 0.04045 {
                x / 12.92
            } else {
                ((x + 0.055) / 1.055).powf(2.4)
            };
            assert!(
                (curve.eval(x) - reference).abs() < 1e-9,
                "sRGB mismatch at {}",
                i
            );
        }
    }

    #[test]
    fn test_srgb_inverse_roundtrip() {
        let curve = ParametricCurve::srgb();
        for i in 0..=255 {
            let x = i as f64 / 255.0;
            let y = curve.eval(x);
            let back = curve.eval_inverse(y);
            assert!(
                (back - x).abs() < 1e-8,
                "inverse failed at {}: {} -> {} -> {}",
                i,
                x,
                y,
                back
            );
        }
    }

    #[test]
    fn test_newton_inverse_type1() {
        let curve =
            ParametricCurve::from_params(ParametricCurveType::Cie122, &[2.0, 1.0, 0.0]).unwrap();
        let y = curve.eval(0.6);
        let back = curve.eval_inverse(y);
        assert!((back - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_monotonic() {
        let curve = ParametricCurve::srgb();
        let mut prev = curve.eval(0.0);
        for i in 1..=1000 {
            let y = curve.eval(i as f64 / 1000.0);
            assert!(y >= prev, "not monotonic at step {}", i);
            prev = y;
        }
    }

    #[test]
    fn test_param_count() {
        assert_eq!(ParametricCurveType::Gamma.param_count(), 1);
        assert_eq!(ParametricCurveType::Cie122.param_count(), 3);
        assert_eq!(ParametricCurveType::Iec61966_3.param_count(), 4);
        assert_eq!(ParametricCurveType::Iec61966_2_1.param_count(), 5);
        assert_eq!(ParametricCurveType::Full.param_count(), 7);
    }

    #[test]
    fn test_unknown_type_code() {
        assert!(ParametricCurveType::from_icc(5).is_none());
        assert_eq!(ParametricCurveType::from_icc(3), Some(ParametricCurveType::Iec61966_2_1));
    }
}
