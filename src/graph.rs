use smallvec::SmallVec;
use std::fmt;

/// Army holding a city. `Unassigned` doubles as the state of a destroyed city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Garrison {
    #[default]
    Unassigned,
    FactionA,
    FactionB,
}

impl Garrison {
    pub fn from_label(label: &str) -> Option<Garrison> {
        match label {
            "A" => Some(Garrison::FactionA),
            "B" => Some(Garrison::FactionB),
            "-" => Some(Garrison::Unassigned),
            _ => None,
        }
    }

    pub fn is_assigned(self) -> bool {
        self != Garrison::Unassigned
    }
}

impl fmt::Display for Garrison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Garrison::Unassigned => "-",
            Garrison::FactionA => "A",
            Garrison::FactionB => "B",
        };
        f.write_str(label)
    }
}

pub type Neighbours = SmallVec<[u32; 4]>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct City {
    cost: u64,
    garrison: Garrison,
    neighbours: Neighbours,
}

impl City {
    fn is_tombstone(&self) -> bool {
        !self.garrison.is_assigned() && self.cost == 0 && self.neighbours.is_empty()
    }
}

/// Outcome of [`Graph::delete_city`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    AlreadyDeleted,
}

/// Cities of one test case and the roads between them.
///
/// The number of cities is fixed at construction. Destroyed cities stay in
/// place as tombstones so indices are never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    cities: Vec<City>,
}

impl Graph {
    /// Panics when `cities` does not fit the `u32` city ids.
    pub fn new(cities: usize) -> Graph {
        assert!(
            u32::try_from(cities).is_ok(),
            "{cities} cities exceed the u32 city ids"
        );
        Graph {
            cities: vec![City::default(); cities],
        }
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    #[track_caller]
    fn city(&self, v: u32) -> &City {
        let len = self.cities.len();
        self.cities
            .get(v as usize)
            .unwrap_or_else(|| panic!("city {v} out of range for a graph of {len} cities"))
    }

    #[track_caller]
    fn city_mut(&mut self, v: u32) -> &mut City {
        let len = self.cities.len();
        self.cities
            .get_mut(v as usize)
            .unwrap_or_else(|| panic!("city {v} out of range for a graph of {len} cities"))
    }

    pub fn cost(&self, v: u32) -> u64 {
        self.city(v).cost
    }

    pub fn garrison(&self, v: u32) -> Garrison {
        self.city(v).garrison
    }

    pub fn neighbours(&self, v: u32) -> &[u32] {
        &self.city(v).neighbours
    }

    pub fn is_deleted(&self, v: u32) -> bool {
        self.city(v).is_tombstone()
    }

    /// Number of roads, counting duplicates once per copy.
    pub fn road_count(&self) -> usize {
        // self loops add two entries to the same list, so halving still holds
        self.cities.iter().map(|c| c.neighbours.len()).sum::<usize>() / 2
    }

    pub fn set_city(&mut self, v: u32, cost: u64, garrison: Garrison) {
        let city = self.city_mut(v);
        city.cost = cost;
        city.garrison = garrison;
    }

    /// Adds an undirected road. Duplicate roads are kept as separate entries.
    pub fn add_edge(&mut self, u: u32, v: u32) {
        // check both ends before touching either list
        self.city(u);
        self.city(v);
        self.city_mut(u).neighbours.push(v);
        self.city_mut(v).neighbours.push(u);
    }

    /// Removes the first occurrence of `v` from the neighbour list of `from`.
    /// Returns whether anything was removed.
    pub(crate) fn remove_link(&mut self, v: u32, from: u32) -> bool {
        let neighbours = &mut self.city_mut(from).neighbours;
        match neighbours.iter().position(|&n| n == v) {
            Some(pos) => {
                neighbours.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Turns `v` into a tombstone and strips every reference to it from the
    /// rest of the graph. Deleting a tombstone is a no-op.
    pub fn delete_city(&mut self, v: u32) -> Deletion {
        let city = self.city_mut(v);
        if city.is_tombstone() {
            tracing::debug!(city = v, "city has already been deleted");
            return Deletion::AlreadyDeleted;
        }
        *city = City::default();

        for from in 0..self.cities.len() as u32 {
            while self.remove_link(v, from) {}
        }
        Deletion::Deleted
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, city) in self.cities.iter().enumerate() {
            if !city.garrison.is_assigned() {
                continue;
            }
            write!(f, "city {i} [{}, cost {}] ->", city.garrison, city.cost)?;
            for n in &city.neighbours {
                write!(f, " {n}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
