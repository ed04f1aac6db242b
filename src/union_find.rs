//! Disjoint-set forest over `0..n`.

/// Union-Find with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Root of the set holding `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // path compression
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merges the sets of `x` and `y`.
    ///
    /// Returns `(kept, absorbed)` roots, or `None` if they already were in the same set.
    pub fn union(&mut self, x: usize, y: usize) -> Option<(usize, usize)> {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return None;
        }
        let (kept, absorbed) = if self.rank[root_x] < self.rank[root_y] {
            (root_y, root_x)
        } else {
            (root_x, root_y)
        };
        self.parent[absorbed] = kept;
        if self.rank[kept] == self.rank[absorbed] {
            self.rank[kept] += 1;
        }
        Some((kept, absorbed))
    }

    /// Every set, members ascending, sets ordered by their smallest member.
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut slot_of_root = vec![usize::MAX; self.parent.len()];
        let mut groups: Vec<Vec<usize>> = vec![];
        for x in 0..self.parent.len() {
            let root = self.find(x);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = groups.len();
                groups.push(vec![]);
            }
            groups[slot_of_root[root]].push(x);
        }
        groups
    }
}
