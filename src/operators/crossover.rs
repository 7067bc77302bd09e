//! # Crossover
//!
//! The four classical recombination operators for order-based genomes.
//!
//! Every operator reads two parents of equal length `L >= 2` and writes the
//! children it is given (`sister` receives the mom-first child, `brother` the
//! dad-first one). The return value is the number of children written.
//!
//! - [`one_point_crossover`]: one cut, tails exchanged. May duplicate genes.
//! - [`partial_match_crossover`] (PMX): keeps a segment of one parent in place
//!   and repairs conflicts through the segment's value mapping.
//! - [`order_crossover`] (OX): keeps a segment and fills the rest in the other
//!   parent's relative order.
//! - [`cycle_crossover`] (CX): every gene keeps its position in one of the
//!   parents, alternating between parents cycle by cycle.
//!
//! PMX, OX and CX require both parents to be permutations of the same value
//! set and always produce permutations of that set.
//!
//! ## Example
//!
//! ```rust
//! use genlist::genome::ListGenome;
//! use genlist::operators::partial_match_crossover_at;
//!
//! let mom: ListGenome<u8> = vec![1, 2, 3, 4, 5, 6].into_iter().collect();
//! let dad: ListGenome<u8> = vec![3, 6, 5, 1, 2, 4].into_iter().collect();
//! let mut sister = ListGenome::new();
//!
//! let produced = partial_match_crossover_at(&mom, &dad, 2, 4, Some(&mut sister), None).unwrap();
//! assert_eq!(produced, 1);
//! assert_eq!(sister.to_vec(), vec![5, 6, 3, 4, 2, 1]);
//! ```

use crate::{
    error::{GeneticError, Result},
    genome::ListGenome,
    rng::RandomNumberGenerator,
};

use super::{check_parents, check_permutation_parents};

/// Single-point crossover with a cut drawn uniformly from `[1, L-1]`.
///
/// # Errors
///
/// Returns `GeneticError::LengthMismatch` if the parents differ in length or
/// are shorter than 2.
pub fn one_point_crossover<T>(
    mom: &ListGenome<T>,
    dad: &ListGenome<T>,
    sister: Option<&mut ListGenome<T>>,
    brother: Option<&mut ListGenome<T>>,
    rng: &mut RandomNumberGenerator,
) -> Result<usize>
where
    T: Clone,
{
    let len = check_parents(mom, dad)?;
    let cut = rng.gen_range(1..len);
    one_point_crossover_at(mom, dad, cut, sister, brother)
}

/// Single-point crossover at a given cut: `sister = mom[..cut] ++ dad[cut..]`
/// and `brother = dad[..cut] ++ mom[cut..]`.
///
/// `cut` may be anywhere in `[0, L]`; the ends reproduce one parent.
pub fn one_point_crossover_at<T>(
    mom: &ListGenome<T>,
    dad: &ListGenome<T>,
    cut: usize,
    sister: Option<&mut ListGenome<T>>,
    brother: Option<&mut ListGenome<T>>,
) -> Result<usize>
where
    T: Clone,
{
    let len = check_parents(mom, dad)?;
    if cut > len {
        return Err(GeneticError::Index { index: cut, len });
    }

    let (mom, dad) = (mom.to_vec(), dad.to_vec());
    let splice = |head: &[T], tail: &[T]| -> Vec<T> {
        head[..cut].iter().chain(&tail[cut..]).cloned().collect()
    };

    Ok(write_child(sister, || splice(&mom, &dad)) + write_child(brother, || splice(&dad, &mom)))
}

/// Partial-match crossover (PMX) with random cut points.
///
/// # Errors
///
/// Returns `GeneticError::LengthMismatch` if the parents differ in length, are
/// shorter than 2, or are not permutations of the same value set.
pub fn partial_match_crossover<T>(
    mom: &ListGenome<T>,
    dad: &ListGenome<T>,
    sister: Option<&mut ListGenome<T>>,
    brother: Option<&mut ListGenome<T>>,
    rng: &mut RandomNumberGenerator,
) -> Result<usize>
where
    T: Clone + PartialEq,
{
    let len = check_parents(mom, dad)?;
    let (a, b) = random_cut_points(len, rng);
    partial_match_crossover_at(mom, dad, a, b, sister, brother)
}

/// PMX over the segment `[a, b)`.
///
/// The sister takes `mom[a..b)` in place. Every other position `p` takes
/// `dad[p]`; when that value already sits in the segment, the value found in
/// `dad` at the conflicting position is tried instead, until a free one turns
/// up. The brother is built the same way with the parents' roles exchanged.
pub fn partial_match_crossover_at<T>(
    mom: &ListGenome<T>,
    dad: &ListGenome<T>,
    a: usize,
    b: usize,
    sister: Option<&mut ListGenome<T>>,
    brother: Option<&mut ListGenome<T>>,
) -> Result<usize>
where
    T: Clone + PartialEq,
{
    let len = check_parents(mom, dad)?;
    check_segment(a, b, len)?;
    let (mom, dad) = (mom.to_vec(), dad.to_vec());
    check_permutation_parents(&mom, &dad)?;

    Ok(write_child(sister, || pmx_child(&mom, &dad, a, b))
        + write_child(brother, || pmx_child(&dad, &mom, a, b)))
}

fn pmx_child<T: Clone + PartialEq>(template: &[T], donor: &[T], a: usize, b: usize) -> Vec<T> {
    let segment = &template[a..b];
    (0..template.len())
        .map(|p| {
            if (a..b).contains(&p) {
                return template[p].clone();
            }
            let mut value = &donor[p];
            while let Some(i) = segment.iter().position(|v| v == value) {
                value = &donor[a + i];
            }
            value.clone()
        })
        .collect()
}

/// Order crossover (OX) with random cut points.
///
/// # Errors
///
/// Same as [`partial_match_crossover`].
pub fn order_crossover<T>(
    mom: &ListGenome<T>,
    dad: &ListGenome<T>,
    sister: Option<&mut ListGenome<T>>,
    brother: Option<&mut ListGenome<T>>,
    rng: &mut RandomNumberGenerator,
) -> Result<usize>
where
    T: Clone + PartialEq,
{
    let len = check_parents(mom, dad)?;
    let (a, b) = random_cut_points(len, rng);
    order_crossover_at(mom, dad, a, b, sister, brother)
}

/// OX over the segment `[a, b)`.
///
/// The sister takes `mom[a..b)` in place. The remaining positions, visited
/// from `b` onwards and wrapping to 0, receive dad's genes in dad's
/// left-to-right order, skipping the genes already in the segment.
pub fn order_crossover_at<T>(
    mom: &ListGenome<T>,
    dad: &ListGenome<T>,
    a: usize,
    b: usize,
    sister: Option<&mut ListGenome<T>>,
    brother: Option<&mut ListGenome<T>>,
) -> Result<usize>
where
    T: Clone + PartialEq,
{
    let len = check_parents(mom, dad)?;
    check_segment(a, b, len)?;
    let (mom, dad) = (mom.to_vec(), dad.to_vec());
    check_permutation_parents(&mom, &dad)?;

    Ok(write_child(sister, || ox_child(&mom, &dad, a, b))
        + write_child(brother, || ox_child(&dad, &mom, a, b)))
}

fn ox_child<T: Clone + PartialEq>(template: &[T], donor: &[T], a: usize, b: usize) -> Vec<T> {
    let len = template.len();
    let segment = &template[a..b];
    let mut child: Vec<Option<T>> = vec![None; len];
    for p in a..b {
        child[p] = Some(template[p].clone());
    }

    let mut fill = donor.iter().filter(|v| !segment.contains(*v));
    for offset in 0..len - (b - a) {
        child[(b + offset) % len] = fill.next().cloned();
    }

    child.into_iter().flatten().collect()
}

/// Cycle crossover (CX).
///
/// Positions are partitioned into cycles: starting from the lowest position
/// not yet assigned, position `p` leads to the position in mom that holds
/// `dad[p]`, until the start is reached again. The sister takes mom's genes on
/// even cycles and dad's on odd ones; the brother takes the complement.
///
/// CX draws no random numbers; the generator is accepted for a uniform
/// operator signature.
///
/// # Errors
///
/// Same as [`partial_match_crossover`].
pub fn cycle_crossover<T>(
    mom: &ListGenome<T>,
    dad: &ListGenome<T>,
    sister: Option<&mut ListGenome<T>>,
    brother: Option<&mut ListGenome<T>>,
    _rng: &mut RandomNumberGenerator,
) -> Result<usize>
where
    T: Clone + PartialEq,
{
    check_parents(mom, dad)?;
    let (mom, dad) = (mom.to_vec(), dad.to_vec());
    check_permutation_parents(&mom, &dad)?;

    let cycles = cycle_labels(&mom, &dad);
    let pick = |first: &[T], second: &[T]| -> Vec<T> {
        cycles
            .iter()
            .enumerate()
            .map(|(p, cycle)| {
                if cycle % 2 == 0 {
                    first[p].clone()
                } else {
                    second[p].clone()
                }
            })
            .collect()
    };

    Ok(write_child(sister, || pick(&mom, &dad)) + write_child(brother, || pick(&dad, &mom)))
}

/// Labels every position with the index of the cycle it belongs to.
fn cycle_labels<T: PartialEq>(mom: &[T], dad: &[T]) -> Vec<usize> {
    let mut labels: Vec<Option<usize>> = vec![None; mom.len()];
    let mut cycle = 0;

    for start in 0..mom.len() {
        if labels[start].is_some() {
            continue;
        }
        let mut pos = start;
        loop {
            labels[pos] = Some(cycle);
            match mom.iter().position(|v| *v == dad[pos]) {
                Some(next) if labels[next].is_none() => pos = next,
                _ => break,
            }
        }
        cycle += 1;
    }

    labels.into_iter().map(|label| label.unwrap_or(0)).collect()
}

/// Two distinct cut points `a < b` drawn uniformly from `[0, L]`.
fn random_cut_points(len: usize, rng: &mut RandomNumberGenerator) -> (usize, usize) {
    let a = rng.gen_index(len + 1);
    let mut b = rng.gen_index(len);
    if b >= a {
        b += 1;
    }
    (a.min(b), a.max(b))
}

fn check_segment(a: usize, b: usize, len: usize) -> Result<()> {
    if b > len {
        return Err(GeneticError::Index { index: b, len });
    }
    if a >= b {
        return Err(GeneticError::Configuration(format!(
            "Cut points must satisfy a < b, got a = {} and b = {}",
            a, b
        )));
    }
    Ok(())
}

fn write_child<T, F>(child: Option<&mut ListGenome<T>>, build: F) -> usize
where
    F: FnOnce() -> Vec<T>,
{
    match child {
        Some(child) => {
            child.replace_contents(build());
            1
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::is_permutation_of;

    fn genome(values: &[char]) -> ListGenome<char> {
        values.iter().copied().collect()
    }

    fn shuffled(rng: &mut RandomNumberGenerator, len: u32) -> ListGenome<u32> {
        let mut values: Vec<u32> = (0..len).collect();
        rng.shuffle(&mut values);
        values.into_iter().collect()
    }

    #[test]
    fn test_one_point_at_cut() {
        let mom = genome(&['a', 'b', 'c', 'd']);
        let dad = genome(&['w', 'x', 'y', 'z']);
        let (mut sister, mut brother) = (ListGenome::new(), ListGenome::new());

        let produced =
            one_point_crossover_at(&mom, &dad, 1, Some(&mut sister), Some(&mut brother)).unwrap();
        assert_eq!(produced, 2);
        assert_eq!(sister.to_vec(), vec!['a', 'x', 'y', 'z']);
        assert_eq!(brother.to_vec(), vec!['w', 'b', 'c', 'd']);
    }

    #[test]
    fn test_one_point_boundary_cuts_copy_a_parent() {
        let mom = genome(&['a', 'b', 'c']);
        let dad = genome(&['x', 'y', 'z']);
        let (mut sister, mut brother) = (ListGenome::new(), ListGenome::new());

        one_point_crossover_at(&mom, &dad, 0, Some(&mut sister), Some(&mut brother)).unwrap();
        assert_eq!(sister, dad);
        assert_eq!(brother, mom);

        one_point_crossover_at(&mom, &dad, 3, Some(&mut sister), Some(&mut brother)).unwrap();
        assert_eq!(sister, mom);
        assert_eq!(brother, dad);

        assert!(matches!(
            one_point_crossover_at(&mom, &dad, 4, Some(&mut sister), None),
            Err(GeneticError::Index { index: 4, len: 3 })
        ));
    }

    #[test]
    fn test_one_point_random_cut_exchanges_tails() {
        let mut rng = RandomNumberGenerator::from_seed(11);
        let mom: ListGenome<u8> = vec![0; 6].into_iter().collect();
        let dad: ListGenome<u8> = vec![1; 6].into_iter().collect();
        let mut sister = ListGenome::new();
        for _ in 0..50 {
            one_point_crossover(&mom, &dad, Some(&mut sister), None, &mut rng).unwrap();
            let values = sister.to_vec();
            let cut = values.iter().position(|&v| v == 1).unwrap();
            assert!((1..6).contains(&cut));
            assert!(values[cut..].iter().all(|&v| v == 1));
        }
    }

    #[test]
    fn test_length_preconditions() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let short = genome(&['a']);
        let pair = genome(&['a', 'b']);
        let triple = genome(&['a', 'b', 'c']);
        let mut child = ListGenome::new();

        assert!(matches!(
            one_point_crossover(&pair, &triple, Some(&mut child), None, &mut rng),
            Err(GeneticError::LengthMismatch(_))
        ));
        assert!(matches!(
            order_crossover(&short, &short, Some(&mut child), None, &mut rng),
            Err(GeneticError::LengthMismatch(_))
        ));
        let empty: ListGenome<char> = ListGenome::new();
        assert!(matches!(
            cycle_crossover(&empty, &empty, Some(&mut child), None, &mut rng),
            Err(GeneticError::LengthMismatch(_))
        ));
    }

    #[test]
    fn test_permutation_operators_reject_repeated_genes() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mom = genome(&['a', 'a', 'b']);
        let dad = genome(&['a', 'b', 'a']);
        let mut child = ListGenome::new();
        assert!(matches!(
            partial_match_crossover(&mom, &dad, Some(&mut child), None, &mut rng),
            Err(GeneticError::LengthMismatch(_))
        ));

        let other_set = genome(&['a', 'b', 'z']);
        assert!(matches!(
            cycle_crossover(&genome(&['a', 'b', 'c']), &other_set, Some(&mut child), None, &mut rng),
            Err(GeneticError::LengthMismatch(_))
        ));
    }

    #[test]
    fn test_pmx_known_offspring() {
        let mom: ListGenome<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9].into_iter().collect();
        let dad: ListGenome<u8> = vec![9, 3, 7, 8, 2, 6, 5, 1, 4].into_iter().collect();
        let (mut sister, mut brother) = (ListGenome::new(), ListGenome::new());

        partial_match_crossover_at(&mom, &dad, 3, 7, Some(&mut sister), Some(&mut brother))
            .unwrap();
        assert_eq!(sister.to_vec(), vec![9, 3, 2, 4, 5, 6, 7, 1, 8]);
        assert_eq!(brother.to_vec(), vec![1, 7, 3, 8, 2, 6, 5, 4, 9]);
    }

    #[test]
    fn test_ox_known_offspring() {
        let mom: ListGenome<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8].into_iter().collect();
        let dad: ListGenome<u8> = vec![8, 7, 6, 5, 4, 3, 2, 1].into_iter().collect();
        let (mut sister, mut brother) = (ListGenome::new(), ListGenome::new());

        order_crossover_at(&mom, &dad, 2, 5, Some(&mut sister), Some(&mut brother)).unwrap();
        // Segment [3, 4, 5] stays; dad's order minus the segment is 8 7 6 2 1,
        // written from position 5 onwards and wrapping.
        assert_eq!(sister.to_vec(), vec![2, 1, 3, 4, 5, 8, 7, 6]);
        // Segment [6, 5, 4] stays; mom's order minus the segment is 1 2 3 7 8.
        assert_eq!(brother.to_vec(), vec![7, 8, 6, 5, 4, 1, 2, 3]);
    }

    #[test]
    fn test_cx_known_offspring() {
        let mom: ListGenome<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8].into_iter().collect();
        let dad: ListGenome<u8> = vec![8, 5, 2, 1, 3, 6, 4, 7].into_iter().collect();
        let (mut sister, mut brother) = (ListGenome::new(), ListGenome::new());
        let mut rng = RandomNumberGenerator::from_seed(0);

        cycle_crossover(&mom, &dad, Some(&mut sister), Some(&mut brother), &mut rng).unwrap();
        // Cycle 0 covers positions {0, 7, 6, 3}, cycle 1 {1, 4, 2}, cycle 2 {5}.
        assert_eq!(sister.to_vec(), vec![1, 5, 2, 4, 3, 6, 7, 8]);
        assert_eq!(brother.to_vec(), vec![8, 2, 3, 1, 5, 6, 4, 7]);
    }

    #[test]
    fn test_cx_identical_parents() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let parent = shuffled(&mut rng, 9);
        let (mut sister, mut brother) = (ListGenome::new(), ListGenome::new());
        cycle_crossover(&parent, &parent, Some(&mut sister), Some(&mut brother), &mut rng)
            .unwrap();
        assert_eq!(sister, parent);
        assert_eq!(brother, parent);
    }

    #[test]
    fn test_permutation_operators_preserve_value_set() {
        let mut rng = RandomNumberGenerator::from_seed(42);
        for len in [2, 3, 5, 8, 13] {
            for _ in 0..40 {
                let mom = shuffled(&mut rng, len);
                let dad = shuffled(&mut rng, len);
                let reference = mom.to_vec();
                let (mut sister, mut brother) = (ListGenome::new(), ListGenome::new());

                partial_match_crossover(&mom, &dad, Some(&mut sister), Some(&mut brother), &mut rng)
                    .unwrap();
                assert!(is_permutation_of(&sister.to_vec(), &reference), "PMX {:?}", sister);
                assert!(is_permutation_of(&brother.to_vec(), &reference), "PMX {:?}", brother);

                order_crossover(&mom, &dad, Some(&mut sister), Some(&mut brother), &mut rng)
                    .unwrap();
                assert!(is_permutation_of(&sister.to_vec(), &reference), "OX {:?}", sister);
                assert!(is_permutation_of(&brother.to_vec(), &reference), "OX {:?}", brother);

                cycle_crossover(&mom, &dad, Some(&mut sister), Some(&mut brother), &mut rng)
                    .unwrap();
                assert!(is_permutation_of(&sister.to_vec(), &reference), "CX {:?}", sister);
                assert!(is_permutation_of(&brother.to_vec(), &reference), "CX {:?}", brother);
            }
        }
    }

    #[test]
    fn test_cx_genes_keep_a_parent_position() {
        let mut rng = RandomNumberGenerator::from_seed(8);
        for _ in 0..30 {
            let mom = shuffled(&mut rng, 10);
            let dad = shuffled(&mut rng, 10);
            let mut sister = ListGenome::new();
            cycle_crossover(&mom, &dad, Some(&mut sister), None, &mut rng).unwrap();
            for (p, gene) in sister.iter().enumerate() {
                assert!(mom.get(p) == Some(gene) || dad.get(p) == Some(gene));
            }
        }
    }

    #[test]
    fn test_children_are_marked_stale() {
        let mom = genome(&['a', 'b', 'c']);
        let dad = genome(&['c', 'a', 'b']);
        let mut sister = genome(&['q']).with_evaluator(
            |_: &ListGenome<char>, _: Option<&crate::genome::UserData>| Ok(1.0),
        );
        sister.evaluate().unwrap();
        order_crossover_at(&mom, &dad, 0, 1, Some(&mut sister), None).unwrap();
        assert!(!sister.is_evaluated());
        assert!(sister.has_evaluator());
    }

    #[test]
    fn test_no_children_requested() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mom = genome(&['a', 'b']);
        let dad = genome(&['b', 'a']);
        assert_eq!(order_crossover(&mom, &dad, None, None, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_random_cut_points_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        for _ in 0..500 {
            let (a, b) = random_cut_points(6, &mut rng);
            assert!(a < b);
            assert!(b <= 6);
        }
    }

    #[test]
    fn test_invalid_segment() {
        let mom = genome(&['a', 'b', 'c']);
        let dad = genome(&['c', 'b', 'a']);
        let mut child = ListGenome::new();
        assert!(partial_match_crossover_at(&mom, &dad, 2, 2, Some(&mut child), None).is_err());
        assert!(order_crossover_at(&mom, &dad, 0, 4, Some(&mut child), None).is_err());
    }
}
