use glam::Vec2;

use crate::collision::{Aabb, RayCastInput};

/// The contract between the pair buffer and the spatial index backing it.
/// Both tree representations implement this, so the broad-phase can wrap
/// either one.
pub trait BroadPhaseStrategy {
    type UserData;

    /// Create a proxy with a fattened AABB and return its id. Proxy ids are
    /// stable for the lifetime of the proxy and may be reused afterwards.
    fn create_proxy(
        &mut self,
        aabb: &Aabb,
        user_data: Self::UserData,
    ) -> usize;

    /// Destroy a proxy. The id must not be used again until a later
    /// `create_proxy` hands it back out.
    fn destroy_proxy(&mut self, proxy_id: usize);

    /// Move a proxy, returning true when it escaped its fat AABB and was
    /// re-inserted.
    fn move_proxy(
        &mut self,
        proxy_id: usize,
        aabb: &Aabb,
        displacement: Vec2,
    ) -> bool;

    fn get_fat_aabb(&self, proxy_id: usize) -> &Aabb;

    fn get_user_data(&self, proxy_id: usize) -> &Self::UserData;

    fn query<F>(&self, aabb: &Aabb, callback: F)
    where
        F: FnMut(usize) -> bool;

    fn ray_cast<F>(&self, input: &RayCastInput, callback: F)
    where
        F: FnMut(&RayCastInput, usize) -> f32;

    fn get_height(&self) -> i32;

    fn get_max_balance(&self) -> i32;

    fn get_area_ratio(&self) -> f32;
}

/// A candidate overlap between two proxies, canonically ordered so that
/// `proxy_id_a < proxy_id_b`. The derived ordering sorts by `proxy_id_a`
/// then `proxy_id_b`, which groups duplicates for the collapse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pair {
    pub proxy_id_a: usize,
    pub proxy_id_b: usize,
}

/// The broad-phase is used for computing pairs and performing volume queries
/// and ray casts. This broad-phase does not persist pairs. Instead, this
/// reports potentially new pairs. It is up to the client to consume the new
/// pairs and to track subsequent overlap.
pub struct BroadPhase<S: BroadPhaseStrategy> {
    pub tree: S,

    /// Proxies touched since the last `update_pairs`. Destroyed proxies are
    /// tombstoned with `None` rather than compacted.
    move_buffer: Vec<Option<usize>>,

    /// Pooled candidate pairs, cleared (not deallocated) every update.
    pair_buffer: Vec<Pair>,

    proxy_count: usize,
}

impl<S: BroadPhaseStrategy + Default> Default for BroadPhase<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: BroadPhaseStrategy> BroadPhase<S> {
    pub fn new(tree: S) -> Self {
        Self {
            tree,
            move_buffer: Vec::new(),
            pair_buffer: Vec::new(),
            proxy_count: 0,
        }
    }

    /// Create a proxy and buffer it so the next `update_pairs` considers it.
    pub fn create_proxy(
        &mut self,
        aabb: &Aabb,
        user_data: S::UserData,
    ) -> usize {
        let proxy_id = self.tree.create_proxy(aabb, user_data);
        self.proxy_count += 1;
        self.buffer_move(proxy_id);
        proxy_id
    }

    /// Destroy a proxy. It is up to the client to remove any pairs.
    pub fn destroy_proxy(&mut self, proxy_id: usize) {
        self.unbuffer_move(proxy_id);
        self.proxy_count -= 1;
        self.tree.destroy_proxy(proxy_id);
    }

    /// Call `move_proxy` as many times as you like, then when you are done
    /// call `update_pairs` to finalize the proxy pairs (for your time step).
    pub fn move_proxy(
        &mut self,
        proxy_id: usize,
        aabb: &Aabb,
        displacement: Vec2,
    ) {
        let buffer = self.tree.move_proxy(proxy_id, aabb, displacement);
        if buffer {
            self.buffer_move(proxy_id);
        }
    }

    /// Force a proxy to be reconsidered for pairing at the next
    /// `update_pairs` without moving it.
    pub fn touch_proxy(&mut self, proxy_id: usize) {
        self.buffer_move(proxy_id);
    }

    pub fn get_fat_aabb(&self, proxy_id: usize) -> &Aabb {
        self.tree.get_fat_aabb(proxy_id)
    }

    pub fn get_user_data(&self, proxy_id: usize) -> &S::UserData {
        self.tree.get_user_data(proxy_id)
    }

    /// Do the fat AABBs of two proxies overlap?
    pub fn test_overlap(&self, proxy_id_a: usize, proxy_id_b: usize) -> bool {
        let a = self.tree.get_fat_aabb(proxy_id_a);
        let b = self.tree.get_fat_aabb(proxy_id_b);
        a.overlaps(b)
    }

    pub fn get_proxy_count(&self) -> usize {
        self.proxy_count
    }

    /// Query the wrapped tree for all proxies whose fat AABB overlaps the
    /// given AABB.
    pub fn query<F>(&self, aabb: &Aabb, callback: F)
    where
        F: FnMut(usize) -> bool,
    {
        self.tree.query(aabb, callback);
    }

    /// Ray-cast against the proxies in the wrapped tree.
    pub fn ray_cast<F>(&self, input: &RayCastInput, callback: F)
    where
        F: FnMut(&RayCastInput, usize) -> f32,
    {
        self.tree.ray_cast(input, callback);
    }

    /// Update the pairs. This results in pair callbacks. This can only add
    /// pairs. The callback is invoked once per unique candidate pair, with
    /// the payloads of the two proxies.
    pub fn update_pairs<F>(&mut self, mut callback: F)
    where
        F: FnMut(&S::UserData, &S::UserData),
    {
        self.pair_buffer.clear();

        // Perform tree queries for all moving proxies.
        {
            let tree = &self.tree;
            let pair_buffer = &mut self.pair_buffer;
            for entry in &self.move_buffer {
                let query_id = match entry {
                    Some(id) => *id,
                    // Tombstoned by destroy_proxy.
                    None => continue,
                };

                // We have to query the tree with the fat AABB so that we
                // don't fail to create a pair that may touch later.
                let fat_aabb = *tree.get_fat_aabb(query_id);
                tree.query(&fat_aabb, |proxy_id| {
                    // A proxy cannot form a pair with itself.
                    if proxy_id != query_id {
                        pair_buffer.push(Pair {
                            proxy_id_a: proxy_id.min(query_id),
                            proxy_id_b: proxy_id.max(query_id),
                        });
                    }
                    true
                });
            }
        }

        // Reset the move buffer.
        self.move_buffer.clear();

        // Sort the pair buffer to expose duplicates.
        self.pair_buffer.sort_unstable();

        // Send the pairs back to the client.
        let mut i = 0;
        while i < self.pair_buffer.len() {
            let pair = self.pair_buffer[i];
            callback(
                self.tree.get_user_data(pair.proxy_id_a),
                self.tree.get_user_data(pair.proxy_id_b),
            );
            i += 1;

            // Skip any duplicate pairs.
            while i < self.pair_buffer.len() && self.pair_buffer[i] == pair {
                i += 1;
            }
        }
    }

    fn buffer_move(&mut self, proxy_id: usize) {
        self.move_buffer.push(Some(proxy_id));
    }

    fn unbuffer_move(&mut self, proxy_id: usize) {
        for entry in &mut self.move_buffer {
            if *entry == Some(proxy_id) {
                *entry = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic_tree::DynamicTree;
    use crate::flat_tree::FlatDynamicTree;

    fn aabb(x1: f32, y1: f32, x2: f32, y2: f32) -> Aabb {
        Aabb::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }

    fn collect_pairs<S>(broad_phase: &mut BroadPhase<S>) -> Vec<(char, char)>
    where
        S: BroadPhaseStrategy<UserData = char>,
    {
        let mut pairs = Vec::new();
        broad_phase.update_pairs(|a, b| pairs.push((*a, *b)));
        pairs
    }

    #[test]
    fn reports_each_overlap_once() {
        let mut broad_phase = BroadPhase::new(DynamicTree::new());
        let a = broad_phase.create_proxy(&aabb(0.0, 0.0, 1.0, 1.0), 'a');
        let b = broad_phase.create_proxy(&aabb(0.5, 0.5, 1.5, 1.5), 'b');
        broad_phase.create_proxy(&aabb(10.0, 10.0, 11.0, 11.0), 'c');
        assert_eq!(broad_phase.get_proxy_count(), 3);

        // Both a and b are buffered, so the overlap is found from both
        // sides; it must still be reported exactly once, low id first.
        assert!(a < b);
        assert_eq!(collect_pairs(&mut broad_phase), vec![('a', 'b')]);

        // The buffer was drained; nothing moved since.
        assert_eq!(collect_pairs(&mut broad_phase), vec![]);
    }

    #[test]
    fn moving_apart_stops_the_pairing() {
        let mut broad_phase = BroadPhase::new(DynamicTree::new());
        let a = broad_phase.create_proxy(&aabb(0.0, 0.0, 1.0, 1.0), 'a');
        let b = broad_phase.create_proxy(&aabb(0.5, 0.5, 1.5, 1.5), 'b');
        broad_phase.create_proxy(&aabb(10.0, 10.0, 11.0, 11.0), 'c');

        assert_eq!(collect_pairs(&mut broad_phase), vec![('a', 'b')]);

        broad_phase.move_proxy(
            b,
            &aabb(20.0, 20.0, 21.0, 21.0),
            Vec2::ZERO,
        );
        assert_eq!(collect_pairs(&mut broad_phase), vec![]);

        broad_phase.destroy_proxy(a);
        let mut hits = Vec::new();
        broad_phase.query(&aabb(0.0, 0.0, 2.0, 2.0), |id| {
            hits.push(id);
            true
        });
        assert!(hits.is_empty());
    }

    #[test]
    fn small_moves_do_not_rebuffer() {
        let mut broad_phase = BroadPhase::new(DynamicTree::new());
        let a = broad_phase.create_proxy(&aabb(0.0, 0.0, 1.0, 1.0), 'a');
        broad_phase.create_proxy(&aabb(0.5, 0.5, 1.5, 1.5), 'b');

        collect_pairs(&mut broad_phase);

        // Still inside the fat AABB: no re-buffering, so no pair report
        // even though the boxes overlap.
        broad_phase.move_proxy(
            a,
            &aabb(0.01, 0.01, 1.01, 1.01),
            Vec2::ZERO,
        );
        assert_eq!(collect_pairs(&mut broad_phase), vec![]);
    }

    #[test]
    fn touch_proxy_rebuffers_without_motion() {
        let mut broad_phase = BroadPhase::new(DynamicTree::new());
        let a = broad_phase.create_proxy(&aabb(0.0, 0.0, 1.0, 1.0), 'a');
        broad_phase.create_proxy(&aabb(0.5, 0.5, 1.5, 1.5), 'b');

        collect_pairs(&mut broad_phase);
        assert_eq!(collect_pairs(&mut broad_phase), vec![]);

        broad_phase.touch_proxy(a);
        assert_eq!(collect_pairs(&mut broad_phase), vec![('a', 'b')]);
    }

    #[test]
    fn destroying_a_buffered_proxy_tombstones_it() {
        let mut broad_phase = BroadPhase::new(DynamicTree::new());
        broad_phase.create_proxy(&aabb(0.0, 0.0, 1.0, 1.0), 'a');
        let b = broad_phase.create_proxy(&aabb(0.5, 0.5, 1.5, 1.5), 'b');

        // b is still sitting in the move buffer when it dies.
        broad_phase.destroy_proxy(b);
        assert_eq!(collect_pairs(&mut broad_phase), vec![]);
        assert_eq!(broad_phase.get_proxy_count(), 1);
    }

    #[test]
    fn test_overlap_uses_the_fat_aabbs() {
        let mut broad_phase = BroadPhase::new(DynamicTree::new());
        let a = broad_phase.create_proxy(&aabb(0.0, 0.0, 1.0, 1.0), 'a');
        // Slightly apart, but the fat margins touch.
        let b = broad_phase.create_proxy(&aabb(1.1, 0.0, 2.1, 1.0), 'b');
        let c = broad_phase.create_proxy(&aabb(5.0, 5.0, 6.0, 6.0), 'c');

        assert!(broad_phase.test_overlap(a, b));
        assert!(!broad_phase.test_overlap(a, c));
    }

    #[test]
    fn ray_cast_reaches_the_wrapped_tree() {
        let mut broad_phase = BroadPhase::new(DynamicTree::new());
        broad_phase.create_proxy(&aabb(2.0, -0.5, 3.0, 0.5), 'a');
        broad_phase.create_proxy(&aabb(2.0, 5.0, 3.0, 6.0), 'b');

        let input = RayCastInput {
            p1: Vec2::new(0.0, 0.0),
            p2: Vec2::new(10.0, 0.0),
            max_fraction: 1.0,
        };

        let mut hit = Vec::new();
        broad_phase.ray_cast(&input, |_, id| {
            hit.push(*broad_phase.get_user_data(id));
            -1.0
        });
        assert_eq!(hit, vec!['a']);
    }

    #[test]
    fn works_with_the_flat_tree_strategy() {
        let mut broad_phase = BroadPhase::new(FlatDynamicTree::new());
        broad_phase.create_proxy(&aabb(0.0, 0.0, 1.0, 1.0), 'a');
        let b = broad_phase.create_proxy(&aabb(0.5, 0.5, 1.5, 1.5), 'b');
        broad_phase.create_proxy(&aabb(10.0, 10.0, 11.0, 11.0), 'c');

        assert_eq!(collect_pairs(&mut broad_phase), vec![('a', 'b')]);

        broad_phase.move_proxy(
            b,
            &aabb(9.5, 9.5, 10.5, 10.5),
            Vec2::new(9.0, 9.0),
        );
        assert_eq!(collect_pairs(&mut broad_phase), vec![('b', 'c')]);
    }
}
