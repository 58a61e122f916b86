use glam::Vec2;

use crate::broad_phase::BroadPhaseStrategy;
use crate::collision::{Aabb, RayCastInput};
use crate::common::{AABB_EXTENSION, AABB_MULTIPLIER};

const NULL_NODE: i32 = -1;

/// A dynamic AABB tree behaviorally identical to
/// [`DynamicTree`](crate::dynamic_tree::DynamicTree), storing the node fields
/// in parallel flat arrays indexed by node id instead of a pool of node
/// structs. The extra indirection of the struct pool is traded for cache
/// locality when walking a single field across many nodes.
///
/// `NULL_NODE` (-1) stands in for absent links throughout the arrays; it
/// never escapes through the public API.
pub struct FlatDynamicTree<T> {
    root: i32,
    aabb: Vec<Aabb>,
    user_data: Vec<Option<T>>,
    /// Doubles as the next pointer while a node sits on the free list.
    parent: Vec<i32>,
    child1: Vec<i32>,
    child2: Vec<i32>,
    height: Vec<i32>,
    node_count: usize,
    free_list: i32,
    insertion_count: usize,
}

impl<T> Default for FlatDynamicTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FlatDynamicTree<T> {
    pub fn new() -> Self {
        let mut tree = Self {
            root: NULL_NODE,
            aabb: Vec::new(),
            user_data: Vec::new(),
            parent: Vec::new(),
            child1: Vec::new(),
            child2: Vec::new(),
            height: Vec::new(),
            node_count: 0,
            free_list: NULL_NODE,
            insertion_count: 0,
        };
        tree.expand_buffers(16);
        tree
    }

    pub fn create_proxy(&mut self, aabb: &Aabb, user_data: T) -> usize {
        let leaf = self.allocate_node();
        let i = leaf as usize;

        // Fatten the aabb.
        let r = Vec2::splat(AABB_EXTENSION);
        self.aabb[i] = Aabb::new(aabb.lower_bound - r, aabb.upper_bound + r);
        self.user_data[i] = Some(user_data);
        self.height[i] = 0;

        self.insert_leaf(leaf);
        leaf as usize
    }

    pub fn destroy_proxy(&mut self, proxy_id: usize) {
        let leaf = proxy_id as i32;
        debug_assert!(proxy_id < self.aabb.len());
        debug_assert!(self.is_leaf(leaf));

        self.remove_leaf(leaf);
        self.free_node(leaf);
    }

    pub fn move_proxy(
        &mut self,
        proxy_id: usize,
        aabb: &Aabb,
        displacement: Vec2,
    ) -> bool {
        let leaf = proxy_id as i32;
        debug_assert!(proxy_id < self.aabb.len());
        debug_assert!(self.is_leaf(leaf));

        if self.aabb[proxy_id].contains(aabb) {
            return false;
        }

        self.remove_leaf(leaf);

        // Extend AABB.
        let r = Vec2::splat(AABB_EXTENSION);
        let mut fat_aabb =
            Aabb::new(aabb.lower_bound - r, aabb.upper_bound + r);

        // Predict AABB movement.
        let d = AABB_MULTIPLIER * displacement;

        if d.x < 0.0 {
            fat_aabb.lower_bound.x += d.x;
        } else {
            fat_aabb.upper_bound.x += d.x;
        }

        if d.y < 0.0 {
            fat_aabb.lower_bound.y += d.y;
        } else {
            fat_aabb.upper_bound.y += d.y;
        }

        self.aabb[proxy_id] = fat_aabb;
        self.insert_leaf(leaf);
        true
    }

    pub fn get_fat_aabb(&self, proxy_id: usize) -> &Aabb {
        debug_assert!(proxy_id < self.aabb.len());
        &self.aabb[proxy_id]
    }

    pub fn get_user_data(&self, proxy_id: usize) -> &T {
        debug_assert!(self.is_leaf(proxy_id as i32));
        self.user_data[proxy_id].as_ref().unwrap()
    }

    pub fn query<F>(&self, aabb: &Aabb, mut callback: F)
    where
        F: FnMut(usize) -> bool,
    {
        let mut stack = Vec::with_capacity(64);
        if self.root != NULL_NODE {
            stack.push(self.root);
        }

        while let Some(index) = stack.pop() {
            let i = index as usize;
            if !self.aabb[i].overlaps(aabb) {
                continue;
            }

            if self.is_leaf(index) {
                if !callback(i) {
                    return;
                }
            } else {
                stack.push(self.child1[i]);
                stack.push(self.child2[i]);
            }
        }
    }

    pub fn ray_cast<F>(&self, input: &RayCastInput, mut callback: F)
    where
        F: FnMut(&RayCastInput, usize) -> f32,
    {
        let p1 = input.p1;
        let p2 = input.p2;
        let mut r = p2 - p1;
        debug_assert!(r.length_squared() > 0.0);
        r = r.normalize();

        // v is perpendicular to the segment.
        let v = r.perp();
        let abs_v = v.abs();

        let mut max_fraction = input.max_fraction;

        // Build a bounding box for the segment.
        let t = p1 + max_fraction * (p2 - p1);
        let mut segment_aabb = Aabb::new(p1.min(t), p1.max(t));

        let mut stack = Vec::with_capacity(64);
        if self.root != NULL_NODE {
            stack.push(self.root);
        }

        while let Some(index) = stack.pop() {
            let i = index as usize;
            if !self.aabb[i].overlaps(&segment_aabb) {
                continue;
            }

            // Separating axis for segment (Gino, p80).
            // |dot(v, p1 - c)| > dot(|v|, h)
            let c = self.aabb[i].center();
            let h = self.aabb[i].extents();
            let separation = v.dot(p1 - c).abs() - abs_v.dot(h);
            if separation > 0.0 {
                continue;
            }

            if self.is_leaf(index) {
                let sub_input = RayCastInput {
                    p1,
                    p2,
                    max_fraction,
                };

                let value = callback(&sub_input, i);

                if value == 0.0 {
                    // The client has terminated the ray cast.
                    return;
                }

                if value > 0.0 {
                    // Update the segment bounding box.
                    max_fraction = value;
                    let t = p1 + max_fraction * (p2 - p1);
                    segment_aabb.lower_bound = p1.min(t);
                    segment_aabb.upper_bound = p1.max(t);
                }
            } else {
                stack.push(self.child1[i]);
                stack.push(self.child2[i]);
            }
        }
    }

    pub fn get_height(&self) -> i32 {
        if self.root == NULL_NODE {
            return 0;
        }
        self.height[self.root as usize]
    }

    pub fn get_max_balance(&self) -> i32 {
        let mut max_balance = 0;
        for i in 0..self.height.len() {
            if self.height[i] <= 1 {
                continue;
            }

            let child1 = self.child1[i] as usize;
            let child2 = self.child2[i] as usize;
            let balance = (self.height[child2] - self.height[child1]).abs();
            max_balance = max_balance.max(balance);
        }
        max_balance
    }

    pub fn get_area_ratio(&self) -> f32 {
        if self.root == NULL_NODE {
            return 0.0;
        }

        let root_area = self.aabb[self.root as usize].get_perimeter();
        let mut total_area = 0.0;
        for i in 0..self.aabb.len() {
            if self.height[i] < 0 {
                // Free node in the pool.
                continue;
            }
            total_area += self.aabb[i].get_perimeter();
        }

        total_area / root_area
    }

    pub fn get_insertion_count(&self) -> usize {
        self.insertion_count
    }

    fn is_leaf(&self, index: i32) -> bool {
        self.child1[index as usize] == NULL_NODE
    }

    /// Grow all the parallel buffers together, chaining the new tail into the
    /// free list. Existing indices are preserved.
    fn expand_buffers(&mut self, new_capacity: usize) {
        let old_capacity = self.aabb.len();
        debug_assert!(new_capacity > old_capacity);

        self.aabb.resize(new_capacity, Aabb::default());
        self.user_data.resize_with(new_capacity, || None);
        self.parent.resize(new_capacity, NULL_NODE);
        self.child1.resize(new_capacity, NULL_NODE);
        self.child2.resize(new_capacity, NULL_NODE);
        self.height.resize(new_capacity, -1);

        for i in old_capacity..new_capacity {
            self.parent[i] = if i + 1 < new_capacity {
                (i + 1) as i32
            } else {
                NULL_NODE
            };
        }
        self.free_list = old_capacity as i32;
    }

    fn allocate_node(&mut self) -> i32 {
        if self.free_list == NULL_NODE {
            let capacity = self.aabb.len();
            self.expand_buffers(capacity * 2);
        }

        let index = self.free_list;
        let i = index as usize;
        self.free_list = self.parent[i];
        self.parent[i] = NULL_NODE;
        self.child1[i] = NULL_NODE;
        self.child2[i] = NULL_NODE;
        self.height[i] = 0;
        self.user_data[i] = None;
        self.node_count += 1;
        index
    }

    fn free_node(&mut self, index: i32) {
        let i = index as usize;
        self.parent[i] = self.free_list;
        self.child1[i] = NULL_NODE;
        self.child2[i] = NULL_NODE;
        self.height[i] = -1;
        self.user_data[i] = None;
        self.free_list = index;
        self.node_count -= 1;
    }

    fn insert_leaf(&mut self, leaf: i32) {
        self.insertion_count += 1;

        if self.root == NULL_NODE {
            self.root = leaf;
            self.parent[leaf as usize] = NULL_NODE;
            return;
        }

        // Find the best sibling for this node.
        let leaf_aabb = self.aabb[leaf as usize];
        let mut index = self.root;
        while !self.is_leaf(index) {
            let i = index as usize;
            let child1 = self.child1[i];
            let child2 = self.child2[i];

            let area = self.aabb[i].get_perimeter();

            let combined_aabb = self.aabb[i].combine(&leaf_aabb);
            let combined_area = combined_aabb.get_perimeter();

            // Cost of creating a new parent for this node and the new leaf.
            let cost = 2.0 * combined_area;

            // Minimum cost of pushing the leaf further down the tree.
            let inheritance_cost = 2.0 * (combined_area - area);

            // Cost of descending into child1.
            let cost1 = {
                let aabb = self.aabb[child1 as usize].combine(&leaf_aabb);
                if self.is_leaf(child1) {
                    aabb.get_perimeter() + inheritance_cost
                } else {
                    let old_area = self.aabb[child1 as usize].get_perimeter();
                    let new_area = aabb.get_perimeter();
                    (new_area - old_area) + inheritance_cost
                }
            };

            // Cost of descending into child2.
            let cost2 = {
                let aabb = self.aabb[child2 as usize].combine(&leaf_aabb);
                if self.is_leaf(child2) {
                    aabb.get_perimeter() + inheritance_cost
                } else {
                    let old_area = self.aabb[child2 as usize].get_perimeter();
                    let new_area = aabb.get_perimeter();
                    (new_area - old_area) + inheritance_cost
                }
            };

            // Descend according to the minimum cost.
            if cost < cost1 && cost < cost2 {
                break;
            }

            // Descend
            if cost1 < cost2 {
                index = child1;
            } else {
                index = child2;
            }
        }

        let sibling = index;

        // Create a new parent.
        let old_parent = self.parent[sibling as usize];
        let new_parent = self.allocate_node();
        let np = new_parent as usize;
        self.parent[np] = old_parent;
        self.aabb[np] = leaf_aabb.combine(&self.aabb[sibling as usize]);
        self.height[np] = self.height[sibling as usize] + 1;

        if old_parent != NULL_NODE {
            // The sibling was not the root.
            if self.child1[old_parent as usize] == sibling {
                self.child1[old_parent as usize] = new_parent;
            } else {
                self.child2[old_parent as usize] = new_parent;
            }
        } else {
            // The sibling was the root.
            self.root = new_parent;
        }
        self.child1[np] = sibling;
        self.child2[np] = leaf;
        self.parent[sibling as usize] = new_parent;
        self.parent[leaf as usize] = new_parent;

        // Walk back up the tree fixing heights and AABBs.
        let mut index = self.parent[leaf as usize];
        while index != NULL_NODE {
            index = self.balance(index);

            let i = index as usize;
            let child1 = self.child1[i] as usize;
            let child2 = self.child2[i] as usize;

            self.height[i] =
                1 + self.height[child1].max(self.height[child2]);
            self.aabb[i] = self.aabb[child1].combine(&self.aabb[child2]);

            index = self.parent[i];
        }
    }

    fn remove_leaf(&mut self, leaf: i32) {
        if self.root == leaf {
            self.root = NULL_NODE;
            return;
        }

        let parent = self.parent[leaf as usize];
        let grand_parent = self.parent[parent as usize];
        let sibling = if self.child1[parent as usize] == leaf {
            self.child2[parent as usize]
        } else {
            self.child1[parent as usize]
        };

        if grand_parent != NULL_NODE {
            // Destroy the parent and connect the sibling to the grandparent.
            if self.child1[grand_parent as usize] == parent {
                self.child1[grand_parent as usize] = sibling;
            } else {
                self.child2[grand_parent as usize] = sibling;
            }
            self.parent[sibling as usize] = grand_parent;
            self.free_node(parent);

            // Adjust the ancestor bounds.
            let mut index = grand_parent;
            while index != NULL_NODE {
                index = self.balance(index);

                let i = index as usize;
                let child1 = self.child1[i] as usize;
                let child2 = self.child2[i] as usize;

                self.aabb[i] = self.aabb[child1].combine(&self.aabb[child2]);
                self.height[i] =
                    1 + self.height[child1].max(self.height[child2]);

                index = self.parent[i];
            }
        } else {
            self.root = sibling;
            self.parent[sibling as usize] = NULL_NODE;
            self.free_node(parent);
        }
    }

    // Perform a left or right rotation if node A is imbalanced.
    // Returns the new root index of the subtree.
    fn balance(&mut self, i_a: i32) -> i32 {
        let a = i_a as usize;
        if self.is_leaf(i_a) || self.height[a] < 2 {
            return i_a;
        }

        let i_b = self.child1[a];
        let i_c = self.child2[a];
        let b = i_b as usize;
        let c = i_c as usize;

        let balance = self.height[c] - self.height[b];

        // Rotate C up
        if balance > 1 {
            let i_f = self.child1[c];
            let i_g = self.child2[c];
            let f = i_f as usize;
            let g = i_g as usize;

            // Swap A and C
            self.child1[c] = i_a;
            self.parent[c] = self.parent[a];
            self.parent[a] = i_c;

            // A's old parent should point to C
            if self.parent[c] != NULL_NODE {
                let p = self.parent[c] as usize;
                if self.child1[p] == i_a {
                    self.child1[p] = i_c;
                } else {
                    debug_assert!(self.child2[p] == i_a);
                    self.child2[p] = i_c;
                }
            } else {
                self.root = i_c;
            }

            // Rotate
            if self.height[f] > self.height[g] {
                self.child2[c] = i_f;
                self.child2[a] = i_g;
                self.parent[g] = i_a;
                self.aabb[a] = self.aabb[b].combine(&self.aabb[g]);
                self.aabb[c] = self.aabb[a].combine(&self.aabb[f]);

                self.height[a] = 1 + self.height[b].max(self.height[g]);
                self.height[c] = 1 + self.height[a].max(self.height[f]);
            } else {
                self.child2[c] = i_g;
                self.child2[a] = i_f;
                self.parent[f] = i_a;
                self.aabb[a] = self.aabb[b].combine(&self.aabb[f]);
                self.aabb[c] = self.aabb[a].combine(&self.aabb[g]);

                self.height[a] = 1 + self.height[b].max(self.height[f]);
                self.height[c] = 1 + self.height[a].max(self.height[g]);
            }

            return i_c;
        }

        // Rotate B up
        if balance < -1 {
            let i_d = self.child1[b];
            let i_e = self.child2[b];
            let d = i_d as usize;
            let e = i_e as usize;

            // Swap A and B
            self.child1[b] = i_a;
            self.parent[b] = self.parent[a];
            self.parent[a] = i_b;

            // A's old parent should point to B
            if self.parent[b] != NULL_NODE {
                let p = self.parent[b] as usize;
                if self.child1[p] == i_a {
                    self.child1[p] = i_b;
                } else {
                    debug_assert!(self.child2[p] == i_a);
                    self.child2[p] = i_b;
                }
            } else {
                self.root = i_b;
            }

            // Rotate
            if self.height[d] > self.height[e] {
                self.child2[b] = i_d;
                self.child1[a] = i_e;
                self.parent[e] = i_a;
                self.aabb[a] = self.aabb[c].combine(&self.aabb[e]);
                self.aabb[b] = self.aabb[a].combine(&self.aabb[d]);

                self.height[a] = 1 + self.height[c].max(self.height[e]);
                self.height[b] = 1 + self.height[a].max(self.height[d]);
            } else {
                self.child2[b] = i_e;
                self.child1[a] = i_d;
                self.parent[d] = i_a;
                self.aabb[a] = self.aabb[c].combine(&self.aabb[d]);
                self.aabb[b] = self.aabb[a].combine(&self.aabb[e]);

                self.height[a] = 1 + self.height[c].max(self.height[d]);
                self.height[b] = 1 + self.height[a].max(self.height[e]);
            }

            return i_b;
        }

        i_a
    }

    /// Assert the internal invariants. For testing.
    #[cfg(any(test, debug_assertions))]
    pub fn validate(&self) {
        self.validate_structure(self.root);
        self.validate_metrics(self.root);

        let mut free_count = 0;
        let mut free_index = self.free_list;
        while free_index != NULL_NODE {
            assert!((free_index as usize) < self.aabb.len());
            assert_eq!(self.height[free_index as usize], -1);
            free_index = self.parent[free_index as usize];
            free_count += 1;
        }

        assert_eq!(self.get_height(), self.compute_height());
        assert_eq!(self.node_count + free_count, self.aabb.len());
    }

    /// Compute the height by walking the tree rather than trusting the height
    /// array. For testing.
    #[cfg(any(test, debug_assertions))]
    pub fn compute_height(&self) -> i32 {
        if self.root == NULL_NODE {
            return 0;
        }
        self.compute_sub_height(self.root)
    }

    #[cfg(any(test, debug_assertions))]
    fn compute_sub_height(&self, index: i32) -> i32 {
        if self.is_leaf(index) {
            return 0;
        }

        let height1 = self.compute_sub_height(self.child1[index as usize]);
        let height2 = self.compute_sub_height(self.child2[index as usize]);
        1 + height1.max(height2)
    }

    #[cfg(any(test, debug_assertions))]
    fn validate_structure(&self, index: i32) {
        if index == NULL_NODE {
            return;
        }
        let i = index as usize;

        if index == self.root {
            assert_eq!(self.parent[i], NULL_NODE);
        }

        if self.is_leaf(index) {
            assert_eq!(self.child2[i], NULL_NODE);
            assert_eq!(self.height[i], 0);
            assert!(self.user_data[i].is_some());
            return;
        }

        let child1 = self.child1[i];
        let child2 = self.child2[i];
        assert_eq!(self.parent[child1 as usize], index);
        assert_eq!(self.parent[child2 as usize], index);

        self.validate_structure(child1);
        self.validate_structure(child2);
    }

    #[cfg(any(test, debug_assertions))]
    fn validate_metrics(&self, index: i32) {
        if index == NULL_NODE {
            return;
        }
        let i = index as usize;

        if self.is_leaf(index) {
            return;
        }

        let child1 = self.child1[i] as usize;
        let child2 = self.child2[i] as usize;

        let height1 = self.height[child1];
        let height2 = self.height[child2];
        assert_eq!(self.height[i], 1 + height1.max(height2));
        assert!((height2 - height1).abs() <= 1);

        let aabb = self.aabb[child1].combine(&self.aabb[child2]);
        assert_eq!(self.aabb[i].lower_bound, aabb.lower_bound);
        assert_eq!(self.aabb[i].upper_bound, aabb.upper_bound);

        self.validate_metrics(self.child1[i]);
        self.validate_metrics(self.child2[i]);
    }
}

impl<T> BroadPhaseStrategy for FlatDynamicTree<T> {
    type UserData = T;

    fn create_proxy(&mut self, aabb: &Aabb, user_data: T) -> usize {
        FlatDynamicTree::create_proxy(self, aabb, user_data)
    }

    fn destroy_proxy(&mut self, proxy_id: usize) {
        FlatDynamicTree::destroy_proxy(self, proxy_id);
    }

    fn move_proxy(
        &mut self,
        proxy_id: usize,
        aabb: &Aabb,
        displacement: Vec2,
    ) -> bool {
        FlatDynamicTree::move_proxy(self, proxy_id, aabb, displacement)
    }

    fn get_fat_aabb(&self, proxy_id: usize) -> &Aabb {
        FlatDynamicTree::get_fat_aabb(self, proxy_id)
    }

    fn get_user_data(&self, proxy_id: usize) -> &T {
        FlatDynamicTree::get_user_data(self, proxy_id)
    }

    fn query<F>(&self, aabb: &Aabb, callback: F)
    where
        F: FnMut(usize) -> bool,
    {
        FlatDynamicTree::query(self, aabb, callback);
    }

    fn ray_cast<F>(&self, input: &RayCastInput, callback: F)
    where
        F: FnMut(&RayCastInput, usize) -> f32,
    {
        FlatDynamicTree::ray_cast(self, input, callback);
    }

    fn get_height(&self) -> i32 {
        FlatDynamicTree::get_height(self)
    }

    fn get_max_balance(&self) -> i32 {
        FlatDynamicTree::get_max_balance(self)
    }

    fn get_area_ratio(&self) -> f32 {
        FlatDynamicTree::get_area_ratio(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic_tree::DynamicTree;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn aabb(x1: f32, y1: f32, x2: f32, y2: f32) -> Aabb {
        Aabb::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }

    #[test]
    fn create_query_destroy() {
        let mut tree = FlatDynamicTree::new();
        let a = tree.create_proxy(&aabb(0.0, 0.0, 1.0, 1.0), "a");
        let b = tree.create_proxy(&aabb(0.5, 0.5, 1.5, 1.5), "b");
        let c = tree.create_proxy(&aabb(10.0, 10.0, 11.0, 11.0), "c");
        tree.validate();

        let mut hits = Vec::new();
        tree.query(&aabb(0.0, 0.0, 2.0, 2.0), |id| {
            hits.push(*tree.get_user_data(id));
            true
        });
        hits.sort_unstable();
        assert_eq!(hits, vec!["a", "b"]);

        assert_eq!(tree.get_user_data(c), &"c");

        tree.destroy_proxy(a);
        tree.destroy_proxy(b);
        tree.destroy_proxy(c);
        tree.validate();
        assert_eq!(tree.get_height(), 0);
    }

    #[test]
    fn buffers_grow_together() {
        let mut tree = FlatDynamicTree::new();
        // Push well past the initial capacity; internal nodes double the
        // node demand.
        let mut ids = Vec::new();
        for i in 0..100 {
            let x = (i % 10) as f32 * 3.0;
            let y = (i / 10) as f32 * 3.0;
            ids.push(tree.create_proxy(&aabb(x, y, x + 1.0, y + 1.0), i));
        }
        tree.validate();

        for (i, &id) in ids.iter().enumerate() {
            assert_eq!(*tree.get_user_data(id), i);
        }
        assert!(tree.get_max_balance() <= 1);
    }

    #[test]
    fn matches_the_node_pool_tree_operation_for_operation() {
        #[derive(Clone, Copy)]
        enum Op {
            Create(Aabb, u32),
            Destroy(usize),
            Move(usize, Aabb, Vec2),
        }

        // Pre-generate a shared script so both trees see identical traffic.
        let mut rng = StdRng::seed_from_u64(0xf1a7);
        let mut ops = Vec::new();
        let mut live = 0usize;
        for step in 0..400u32 {
            let roll: u32 = rng.gen_range(0..10);
            if live == 0 || roll < 4 {
                let x = rng.gen_range(-40.0..40.0);
                let y = rng.gen_range(-40.0..40.0);
                let w = rng.gen_range(0.1..4.0);
                let h = rng.gen_range(0.1..4.0);
                ops.push(Op::Create(aabb(x, y, x + w, y + h), step));
                live += 1;
            } else if roll < 6 {
                ops.push(Op::Destroy(rng.gen_range(0..live)));
                live -= 1;
            } else {
                let d = Vec2::new(
                    rng.gen_range(-3.0..3.0),
                    rng.gen_range(-3.0..3.0),
                );
                let x = rng.gen_range(-40.0..40.0);
                let y = rng.gen_range(-40.0..40.0);
                ops.push(Op::Move(
                    rng.gen_range(0..live),
                    aabb(x, y, x + 1.0, y + 1.0),
                    d,
                ));
            }
        }

        let mut pool_tree: DynamicTree<u32> = DynamicTree::new();
        let mut flat_tree: FlatDynamicTree<u32> = FlatDynamicTree::new();
        let mut pool_ids = Vec::new();
        let mut flat_ids = Vec::new();

        for op in ops {
            match op {
                Op::Create(tight, tag) => {
                    pool_ids.push(pool_tree.create_proxy(&tight, tag));
                    flat_ids.push(flat_tree.create_proxy(&tight, tag));
                }
                Op::Destroy(slot) => {
                    pool_tree.destroy_proxy(pool_ids.swap_remove(slot));
                    flat_tree.destroy_proxy(flat_ids.swap_remove(slot));
                }
                Op::Move(slot, tight, d) => {
                    let moved1 =
                        pool_tree.move_proxy(pool_ids[slot], &tight, d);
                    let moved2 =
                        flat_tree.move_proxy(flat_ids[slot], &tight, d);
                    assert_eq!(moved1, moved2);
                }
            }

            pool_tree.validate();
            flat_tree.validate();
            assert_eq!(pool_tree.get_height(), flat_tree.get_height());
            assert!(
                (pool_tree.get_area_ratio() - flat_tree.get_area_ratio())
                    .abs()
                    < 1e-4
            );
        }

        // Identical query results, compared by payload.
        let probe = aabb(-25.0, -25.0, 25.0, 25.0);
        let mut hits1 = Vec::new();
        pool_tree.query(&probe, |id| {
            hits1.push(*pool_tree.get_user_data(id));
            true
        });
        let mut hits2 = Vec::new();
        flat_tree.query(&probe, |id| {
            hits2.push(*flat_tree.get_user_data(id));
            true
        });
        hits1.sort_unstable();
        hits2.sort_unstable();
        assert_eq!(hits1, hits2);

        // Identical ray casts, again compared by payload.
        let input = RayCastInput {
            p1: Vec2::new(-45.0, -45.0),
            p2: Vec2::new(45.0, 45.0),
            max_fraction: 1.0,
        };
        let mut casts1 = Vec::new();
        pool_tree.ray_cast(&input, |_, id| {
            casts1.push(*pool_tree.get_user_data(id));
            -1.0
        });
        let mut casts2 = Vec::new();
        flat_tree.ray_cast(&input, |_, id| {
            casts2.push(*flat_tree.get_user_data(id));
            -1.0
        });
        casts1.sort_unstable();
        casts2.sort_unstable();
        assert_eq!(casts1, casts2);
    }
}
