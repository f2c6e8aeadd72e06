/*!
A reader for permutation files.

The format is a count of permutations followed by the permutations themselves, each a sequence of pairs:

```text
c comment lines begin with c
2
1 4 0  2 5 0  3 6 0
0
1 2 0
0
```

Each pair is terminated by a zero, and a lone zero in place of a pair ends the permutation.
A pair names that the variable with the smaller absolute value maps to the variable with the larger absolute value, signs indicating phase --- see [Permutation::from_pairs](crate::symmetry::Permutation::from_pairs).
*/

use std::io::BufRead;

use crate::types::err::ParseError;

/// Reads a permutation file: the declared count, and the pair lists of each permutation.
///
/// Reading continues to the end of the input, whatever count is declared, as the count sizes tables rather than bounding the file.
pub fn read_permutation_pairs(
    reader: impl BufRead,
) -> Result<(usize, Vec<Vec<(i32, i32)>>), ParseError> {
    let mut integers = Vec::default();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => return Err(ParseError::Line(integers.len())),
        };

        if line.trim_start().starts_with('c') {
            continue;
        }

        for token in line.split_whitespace() {
            match token.parse::<i32>() {
                Ok(int) => integers.push(int),
                Err(_) => return Err(ParseError::BadInteger),
            }
        }
    }

    let mut stream = integers.into_iter();

    let declared = match stream.next() {
        Some(count) if count >= 0 => count as usize,
        _ => return Err(ParseError::PermutationCount),
    };

    let mut permutations = Vec::default();
    let mut current: Vec<(i32, i32)> = Vec::default();
    let mut open = false;

    loop {
        let first = match stream.next() {
            Some(int) => int,
            None => break,
        };

        if first == 0 {
            permutations.push(std::mem::take(&mut current));
            open = false;
            continue;
        }

        open = true;
        let second = match stream.next() {
            Some(int) => int,
            None => return Err(ParseError::MissingDelimiter),
        };
        // The zero closing the pair.
        match stream.next() {
            Some(0) => {}
            _ => return Err(ParseError::MissingDelimiter),
        }

        current.push((first, second));
    }

    if open {
        permutations.push(current);
    }

    Ok((declared, permutations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_and_terminators() {
        let file = "c a comment
2
1 4 0 2 5 0 3 6 0
0
1 2 0
0
";
        let (declared, permutations) = read_permutation_pairs(file.as_bytes()).unwrap();
        assert_eq!(declared, 2);
        assert_eq!(permutations.len(), 2);
        assert_eq!(permutations[0], vec![(1, 4), (2, 5), (3, 6)]);
        assert_eq!(permutations[1], vec![(1, 2)]);
    }

    #[test]
    fn absent_final_terminator() {
        let file = "1
1 2 0";
        let (_, permutations) = read_permutation_pairs(file.as_bytes()).unwrap();
        assert_eq!(permutations, vec![vec![(1, 2)]]);
    }

    #[test]
    fn missing_count() {
        let file = "";
        assert_eq!(
            read_permutation_pairs(file.as_bytes()),
            Err(ParseError::PermutationCount)
        );
    }

    #[test]
    fn unterminated_pair() {
        let file = "1
1 2";
        assert_eq!(
            read_permutation_pairs(file.as_bytes()),
            Err(ParseError::MissingDelimiter)
        );
    }
}
