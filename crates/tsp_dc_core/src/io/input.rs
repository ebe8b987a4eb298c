use std::{fs, io::Read};

use crate::{io::options::SolverOptions, node::Point, Error, Result};

/// Runtime input: the ordered point set whose positions define node
/// indices 0..N-1 for every solver.
#[derive(Clone, Debug)]
pub struct SolverInput {
    points: Vec<Point>,
}

impl SolverInput {
    pub fn new(points: &[Point]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }

    /// Reads `x,y` whitespace-separated tokens from `--input` or stdin.
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        let raw = match options.input_path() {
            Some(path) => fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };
        Ok(Self {
            points: parse_points(&raw)?,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn n(&self) -> usize {
        self.points.len()
    }

    pub fn get_point(&self, idx: usize) -> Point {
        self.points[idx]
    }
}

fn parse_points(raw: &str) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    for (idx, tok) in raw.split_whitespace().enumerate() {
        let mut it = tok.split(',');
        let x_s = it
            .next()
            .ok_or_else(|| Error::invalid_input(format!("Token {}: missing x", idx + 1)))?;
        let y_s = it
            .next()
            .ok_or_else(|| Error::invalid_input(format!("Token {}: missing y", idx + 1)))?;

        if it.next().is_some() {
            return Err(Error::invalid_input(format!(
                "Token {}: expected 'x,y' but got extra comma fields: {tok}",
                idx + 1
            )));
        }

        let x: f64 = x_s.parse().map_err(|_| {
            Error::invalid_input(format!("Token {}: invalid x value: {}", idx + 1, x_s))
        })?;
        let y: f64 = y_s.parse().map_err(|_| {
            Error::invalid_input(format!("Token {}: invalid y value: {}", idx + 1, y_s))
        })?;

        points.push(Point::new(x, y));
    }

    if points.is_empty() {
        return Err(Error::invalid_input("No points provided."));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::parse_points;
    use crate::node::Point;

    #[test]
    fn parses_whitespace_separated_tokens() {
        let points = parse_points("1.0,2.0 3.5,-4.25\n5,6").unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(1.0, 2.0),
                Point::new(3.5, -4.25),
                Point::new(5.0, 6.0),
            ]
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(parse_points("1.0").is_err());
        assert!(parse_points("1.0,2.0,3.0").is_err());
        assert!(parse_points("a,b").is_err());
        assert!(parse_points("").is_err());
    }

    #[test]
    fn error_message_names_the_offending_token() {
        let err = parse_points("1,2 nope,3").unwrap_err();
        assert!(err.to_string().contains("Token 2"));
    }
}
