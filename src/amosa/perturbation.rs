//! Random points and single-variable moves over typed, bounded variables.
//!
//! Every function draws from the caller's generator in a fixed order, so
//! a seeded run always produces the same sequence of points.

use super::types::{VarType, Variable};
use rand::Rng;

/// A single-variable move: which variable, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Index of the variable to change.
    pub index: usize,
    /// Direction of the change for real and integer variables.
    pub upward: bool,
}

/// Uniform random point within bounds.
///
/// REAL: continuous uniform; INTEGER: uniform over the integer range;
/// BINARY: uniform over {0, 1}.
pub fn random_point<R: Rng>(vars: &[Variable], rng: &mut R) -> Vec<f64> {
    vars.iter()
        .map(|v| {
            if v.is_fixed() {
                return v.lower;
            }
            match v.kind {
                VarType::Real => rng.random_range(v.lower..=v.upper),
                VarType::Integer => rng.random_range(v.lower as i64..=v.upper as i64) as f64,
                VarType::Binary => {
                    if rng.random_bool(0.5) {
                        1.0
                    } else {
                        0.0
                    }
                }
            }
        })
        .collect()
}

/// The point with every variable at its lower bound.
pub fn lower_point(vars: &[Variable]) -> Vec<f64> {
    vars.iter().map(|v| v.lower).collect()
}

/// The point with every variable at its upper bound.
pub fn upper_point(vars: &[Variable]) -> Vec<f64> {
    vars.iter().map(|v| v.upper).collect()
}

/// Picks a random free variable and direction.
///
/// When `avoid` names a variable and another free variable exists, the
/// avoided one is never picked.
///
/// # Panics
///
/// Panics if no variable is free; problem validation rules that out.
pub fn random_move<R: Rng>(vars: &[Variable], avoid: Option<usize>, rng: &mut R) -> Move {
    let mut free: Vec<usize> = (0..vars.len()).filter(|&i| !vars[i].is_fixed()).collect();
    assert!(!free.is_empty(), "at least one variable must be free");
    if let Some(a) = avoid {
        if free.len() > 1 {
            free.retain(|&i| i != a);
        }
    }
    let index = free[rng.random_range(0..free.len())];
    let upward = rng.random_bool(0.5);
    Move { index, upward }
}

/// Applies `mv` to a copy of `x`.
///
/// - REAL: a random step of up to the distance to the bound in the move's
///   direction (the opposite one if already at that bound), clamped.
/// - INTEGER: half of the time a unit step, otherwise a jump to a random
///   different in-range value.
/// - BINARY: bit flip.
///
/// The changed variable always differs from its previous value.
pub fn apply_move<R: Rng>(x: &[f64], vars: &[Variable], mv: Move, rng: &mut R) -> Vec<f64> {
    let mut y = x.to_vec();
    let var = &vars[mv.index];
    let cur = x[mv.index];

    let room_up = var.upper - cur;
    let room_down = cur - var.lower;
    let upward = if mv.upward { room_up > 0.0 } else { room_down <= 0.0 };

    let next = match var.kind {
        VarType::Real => {
            let room = if upward { room_up } else { room_down };
            // 1 - u lies in (0, 1], so the step is never zero.
            let step = room * (1.0 - rng.random::<f64>());
            if upward {
                cur + step
            } else {
                cur - step
            }
        }
        VarType::Integer => {
            if rng.random_bool(0.5) {
                if upward {
                    cur + 1.0
                } else {
                    cur - 1.0
                }
            } else {
                let lo = var.lower as i64;
                let span = (var.upper - var.lower) as i64;
                let mut v = lo + rng.random_range(0..span);
                if v >= cur as i64 {
                    v += 1;
                }
                v as f64
            }
        }
        VarType::Binary => 1.0 - cur,
    };

    y[mv.index] = var.clamp(next);
    y
}

/// Perturbs one randomly chosen free variable of `x`.
pub fn perturb<R: Rng>(x: &[f64], vars: &[Variable], rng: &mut R) -> Vec<f64> {
    let mv = random_move(vars, None, rng);
    apply_move(x, vars, mv, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn mixed() -> Vec<Variable> {
        vec![
            Variable::real(-1.0, 2.0),
            Variable::integer(0, 9),
            Variable::binary(),
            Variable::real(3.0, 3.0),
        ]
    }

    fn within(vars: &[Variable], x: &[f64]) -> bool {
        vars.iter().zip(x.iter()).all(|(v, &xi)| v.contains(xi))
    }

    #[test]
    fn test_random_point_within_bounds() {
        let vars = mixed();
        let mut rng = create_rng(11);
        for _ in 0..500 {
            let x = random_point(&vars, &mut rng);
            assert!(within(&vars, &x), "out of bounds: {x:?}");
            assert_eq!(x[3], 3.0);
        }
    }

    #[test]
    fn test_corner_points() {
        let vars = mixed();
        assert_eq!(lower_point(&vars), vec![-1.0, 0.0, 0.0, 3.0]);
        assert_eq!(upper_point(&vars), vec![2.0, 9.0, 1.0, 3.0]);
    }

    #[test]
    fn test_random_move_skips_fixed_and_avoided() {
        let vars = mixed();
        let mut rng = create_rng(5);
        for _ in 0..200 {
            let mv = random_move(&vars, Some(0), &mut rng);
            assert_ne!(mv.index, 3);
            assert_ne!(mv.index, 0);
        }
    }

    #[test]
    fn test_random_move_single_free_variable_ignores_avoid() {
        let vars = vec![Variable::real(0.0, 1.0), Variable::real(2.0, 2.0)];
        let mut rng = create_rng(5);
        assert_eq!(random_move(&vars, Some(0), &mut rng).index, 0);
    }

    #[test]
    fn test_perturb_changes_exactly_one_variable() {
        let vars = mixed();
        let mut rng = create_rng(9);
        let mut x = random_point(&vars, &mut rng);
        for _ in 0..1000 {
            let y = perturb(&x, &vars, &mut rng);
            assert!(within(&vars, &y), "out of bounds: {y:?}");
            let changed = x.iter().zip(y.iter()).filter(|(a, b)| a != b).count();
            assert_eq!(changed, 1, "{x:?} -> {y:?}");
            x = y;
        }
    }

    #[test]
    fn test_move_at_bound_turns_around() {
        let vars = vec![Variable::real(0.0, 1.0)];
        let mut rng = create_rng(1);
        let y = apply_move(&[1.0], &vars, Move { index: 0, upward: true }, &mut rng);
        assert!(y[0] < 1.0 && y[0] >= 0.0);

        let vars = vec![Variable::integer(0, 4)];
        let y = apply_move(&[0.0], &vars, Move { index: 0, upward: false }, &mut rng);
        assert!(y[0] > 0.0);
    }

    #[test]
    fn test_binary_flip() {
        let vars = vec![Variable::binary()];
        let mut rng = create_rng(1);
        assert_eq!(perturb(&[0.0], &vars, &mut rng), vec![1.0]);
        assert_eq!(perturb(&[1.0], &vars, &mut rng), vec![0.0]);
    }

    #[test]
    fn test_perturb_deterministic_for_seed() {
        let vars = mixed();
        let run = || {
            let mut rng = create_rng(77);
            let mut x = random_point(&vars, &mut rng);
            for _ in 0..50 {
                x = perturb(&x, &vars, &mut rng);
            }
            x
        };
        assert_eq!(run(), run());
    }
}
