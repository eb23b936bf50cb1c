//! The list of example mazes shipped next to the images.
//!
//! `examples.csv` starts with a header line and has one maze per row:
//!
//! ```text
//! image,entry_x,entry_y,exit_x,exit_y
//! maze-01.png,0,14,51,44
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::grid::Point;

pub const CATALOGUE_FILE: &str = "examples.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeExample {
    /// Relative to the assets directory
    pub image: PathBuf,
    pub entry: Point,
    pub exit: Point,
}

impl FromStr for MazeExample {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let columns: Vec<&str> = s.split(',').map(str::trim).collect();
        let [image, entry_x, entry_y, exit_x, exit_y] = columns[..] else {
            return Err(anyhow!("Expected 5 columns, given {}: {}", columns.len(), s));
        };

        let coordinate = |value: &str| {
            value
                .parse::<usize>()
                .with_context(|| format!("Invalid coordinate: {}", value))
        };

        Ok(MazeExample {
            image: PathBuf::from(image),
            entry: Point::new(coordinate(entry_x)?, coordinate(entry_y)?),
            exit: Point::new(coordinate(exit_x)?, coordinate(exit_y)?),
        })
    }
}

#[derive(Debug)]
pub struct Catalogue {
    root: PathBuf,
    examples: Vec<MazeExample>,
}

impl Catalogue {
    /// Read `examples.csv` from the assets directory
    pub fn load(assets: &Path) -> Result<Self, anyhow::Error> {
        let path = assets.join(CATALOGUE_FILE);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalogue {}", path.display()))?;
        Self::parse(assets, &contents)
    }

    pub fn parse(root: &Path, contents: &str) -> Result<Self, anyhow::Error> {
        let examples = contents
            .lines()
            .enumerate()
            .skip(1)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                line.parse::<MazeExample>()
                    .with_context(|| format!("Invalid catalogue row {}", n + 1))
            })
            .collect::<Result<Vec<MazeExample>, _>>()?;

        Ok(Self {
            root: root.to_path_buf(),
            examples,
        })
    }

    /// Examples are numbered from 1
    pub fn get(&self, id: usize) -> Result<&MazeExample, anyhow::Error> {
        id.checked_sub(1)
            .and_then(|i| self.examples.get(i))
            .ok_or_else(|| {
                anyhow!(
                    "No maze example {}, the catalogue has {}",
                    id,
                    self.examples.len()
                )
            })
    }

    pub fn image_path(&self, example: &MazeExample) -> PathBuf {
        self.root.join(&example.image)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MazeExample> {
        self.examples.iter()
    }
}

#[cfg(test)]
mod test {

    use super::*;

    const CSV: &str = "image,entry_x,entry_y,exit_x,exit_y
maze-01.png,0,14,51,44
maze-02.png, 3, 0, 40, 79

";

    #[test]
    fn test_parse_catalogue() {
        let catalogue = Catalogue::parse(Path::new("assets"), CSV).unwrap();

        assert_eq!(catalogue.len(), 2);
        let first = catalogue.get(1).unwrap();
        assert_eq!(first.entry, Point::new(0, 14));
        assert_eq!(first.exit, Point::new(51, 44));
        assert_eq!(
            catalogue.image_path(first),
            Path::new("assets").join("maze-01.png")
        );
        assert_eq!(catalogue.get(2).unwrap().entry, Point::new(3, 0));
    }

    #[test]
    fn test_ids_start_at_one() {
        let catalogue = Catalogue::parse(Path::new("."), CSV).unwrap();
        assert!(catalogue.get(0).is_err());
        assert!(catalogue.get(3).is_err());
    }

    #[test]
    fn test_malformed_rows() {
        assert!("maze.png,1,2,3".parse::<MazeExample>().is_err());
        assert!("maze.png,1,2,3,x".parse::<MazeExample>().is_err());
        assert!("maze.png,1,-2,3,4".parse::<MazeExample>().is_err());

        let err = Catalogue::parse(Path::new("."), "header\nmaze.png,1\n").unwrap_err();
        assert!(format!("{:#}", err).contains("row 2"));
    }

    #[test]
    fn test_missing_file() {
        let err = Catalogue::load(Path::new("does/not/exist")).unwrap_err();
        assert!(format!("{}", err).contains(CATALOGUE_FILE));
    }
}
