/// Keyword permutation enumeration
///
/// Cartesian product of the `multi_compile` axes, first axis outermost. The
/// product is walked with an explicit cursor per axis (an odometer), so deep
/// axis lists never recurse.

/// Every combination picking one keyword per axis
///
/// Zero axes yield exactly one empty permutation; an empty axis yields none.
pub fn enumerate_keywords(axes: &[Vec<String>]) -> Vec<Vec<String>> {
    if axes.iter().any(Vec::is_empty) {
        return Vec::new();
    }

    let mut permutations = Vec::with_capacity(permutation_count(axes));
    let mut cursor = vec![0usize; axes.len()];

    loop {
        permutations.push(
            cursor
                .iter()
                .zip(axes)
                .map(|(&choice, axis)| axis[choice].clone())
                .collect(),
        );

        // Advance the innermost axis, carrying into outer ones
        let mut depth = axes.len();
        loop {
            if depth == 0 {
                return permutations;
            }
            depth -= 1;
            cursor[depth] += 1;
            if cursor[depth] < axes[depth].len() {
                break;
            }
            cursor[depth] = 0;
        }
    }
}

/// Number of permutations `enumerate_keywords` would produce
pub fn permutation_count(axes: &[Vec<String>]) -> usize {
    axes.iter().map(Vec::len).product()
}

#[cfg(test)]
#[path = "permutation_tests.rs"]
mod tests;
