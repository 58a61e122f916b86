use glam::Vec2;

use crate::broad_phase::BroadPhaseStrategy;
use crate::collision::{Aabb, RayCastInput};
use crate::common::{AABB_EXTENSION, AABB_MULTIPLIER};

/// How a node is linked to the rest of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeNodeConnection {
    /// Root of the tree, or tail of the free list.
    None,
    /// Tree mode.
    Parent(usize),
    /// Free-list mode.
    Next(usize),
}

/// A node in the dynamic tree. The client does not interact with this directly.
#[derive(Debug, Clone)]
struct TreeNode<T> {
    /// The fat AABB enclosing this node's subtree.
    aabb: Aabb,
    connection: TreeNodeConnection,

    child1: Option<usize>,
    child2: Option<usize>,

    /// Leaf = 0, free node = -1.
    height: i32,

    /// Leaf payload.
    user_data: Option<T>,
}

impl<T> TreeNode<T> {
    fn is_leaf(&self) -> bool {
        self.child1.is_none()
    }
}

/// A dynamic AABB tree broad-phase, inspired by Nathanael Presson's btDbvt.
/// A dynamic tree arranges data in a binary tree to accelerate
/// queries such as volume queries and ray casts. Leafs are proxies
/// with an AABB. In the tree we expand the proxy AABB by `AABB_EXTENSION`
/// so that the proxy AABB is bigger than the client object. This allows the
/// client object to move by small amounts without triggering a tree update.
///
/// Nodes are pooled and relocatable, so we use node indices rather than
/// pointers. Freed nodes are chained into a free list threaded through the
/// node pool.
#[derive(Debug, Clone)]
pub struct DynamicTree<T> {
    root: Option<usize>,
    nodes: Vec<TreeNode<T>>,
    free_list: Option<usize>,
    node_count: usize,
    insertion_count: usize,
}

impl<T> Default for DynamicTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DynamicTree<T> {
    pub fn new() -> Self {
        let mut tree = Self {
            root: None,
            nodes: Vec::new(),
            free_list: None,
            node_count: 0,
            insertion_count: 0,
        };
        // Build a linked list for the free list.
        tree.grow();
        tree
    }

    /// Create a proxy in the tree as a leaf node. The leaf AABB is fattened
    /// so small movements of the client object do not touch the tree.
    pub fn create_proxy(&mut self, aabb: &Aabb, user_data: T) -> usize {
        let proxy_id = self.allocate_node();

        // Fatten the aabb.
        let r = Vec2::splat(AABB_EXTENSION);
        let node = &mut self.nodes[proxy_id];
        node.aabb.lower_bound = aabb.lower_bound - r;
        node.aabb.upper_bound = aabb.upper_bound + r;
        node.height = 0;
        node.user_data = Some(user_data);

        self.insert_leaf(proxy_id);
        proxy_id
    }

    /// Destroy a proxy. The id must refer to a leaf.
    pub fn destroy_proxy(&mut self, proxy_id: usize) {
        debug_assert!(proxy_id < self.nodes.len());
        debug_assert!(self.nodes[proxy_id].is_leaf());

        self.remove_leaf(proxy_id);
        self.free_node(proxy_id);
    }

    /// Move a proxy with a swept AABB. If the proxy has moved outside of its
    /// fattened AABB, then the proxy is removed from the tree and re-inserted.
    /// Otherwise the function returns immediately.
    ///
    /// Returns true if the proxy was re-inserted and should be re-buffered as
    /// moved.
    pub fn move_proxy(
        &mut self,
        proxy_id: usize,
        aabb: &Aabb,
        displacement: Vec2,
    ) -> bool {
        debug_assert!(proxy_id < self.nodes.len());
        debug_assert!(self.nodes[proxy_id].is_leaf());

        if self.nodes[proxy_id].aabb.contains(aabb) {
            return false;
        }

        self.remove_leaf(proxy_id);

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

        self.nodes[proxy_id].aabb = fat_aabb;
        self.insert_leaf(proxy_id);
        true
    }

    /// The fat AABB of a proxy.
    pub fn get_fat_aabb(&self, proxy_id: usize) -> &Aabb {
        debug_assert!(proxy_id < self.nodes.len());
        &self.nodes[proxy_id].aabb
    }

    /// The payload registered with a proxy.
    pub fn get_user_data(&self, proxy_id: usize) -> &T {
        debug_assert!(self.nodes[proxy_id].is_leaf());
        self.nodes[proxy_id].user_data.as_ref().unwrap()
    }

    /// Query the tree for all proxies whose fat AABB overlaps the given AABB.
    /// The callback may return false to abort the traversal.
    pub fn query<F>(&self, aabb: &Aabb, mut callback: F)
    where
        F: FnMut(usize) -> bool,
    {
        let mut stack = Vec::with_capacity(64);
        if let Some(root) = self.root {
            stack.push(root);
        }

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.aabb.overlaps(aabb) {
                continue;
            }

            if node.is_leaf() {
                if !callback(index) {
                    return;
                }
            } else {
                stack.push(node.child1.unwrap());
                stack.push(node.child2.unwrap());
            }
        }
    }

    /// Ray-cast against the proxies in the tree. This relies on the callback
    /// to perform an exact ray-cast in the case where the proxy contains a
    /// shape. The callback also performs the any collision filtering. This has
    /// performance roughly equal to k * log(n), where k is the number of
    /// collisions and n is the number of proxies in the tree.
    ///
    /// The callback is invoked for each proxy that is hit by the segment and
    /// returns a fraction: 0 terminates the ray-cast, a positive value clips
    /// the segment to that fraction, anything else leaves the segment as is.
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

        // Separating axis for segment (Gino, p80).
        // |dot(v, p1 - c)| > dot(|v|, h)

        let mut max_fraction = input.max_fraction;

        // Build a bounding box for the segment.
        let t = p1 + max_fraction * (p2 - p1);
        let mut segment_aabb = Aabb::new(p1.min(t), p1.max(t));

        let mut stack = Vec::with_capacity(64);
        if let Some(root) = self.root {
            stack.push(root);
        }

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.aabb.overlaps(&segment_aabb) {
                continue;
            }

            let c = node.aabb.center();
            let h = node.aabb.extents();
            let separation = v.dot(p1 - c).abs() - abs_v.dot(h);
            if separation > 0.0 {
                continue;
            }

            if node.is_leaf() {
                let sub_input = RayCastInput {
                    p1,
                    p2,
                    max_fraction,
                };

                let value = callback(&sub_input, index);

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
                stack.push(node.child1.unwrap());
                stack.push(node.child2.unwrap());
            }
        }
    }

    /// The height of the tree, 0 when empty.
    pub fn get_height(&self) -> i32 {
        match self.root {
            Some(root) => self.nodes[root].height,
            None => 0,
        }
    }

    /// The maximum balance factor over all internal nodes. A well balanced
    /// tree never exceeds 1.
    pub fn get_max_balance(&self) -> i32 {
        let mut max_balance = 0;
        for node in &self.nodes {
            if node.height <= 1 {
                continue;
            }

            let child1 = node.child1.unwrap();
            let child2 = node.child2.unwrap();
            let balance =
                (self.nodes[child2].height - self.nodes[child1].height).abs();
            max_balance = max_balance.max(balance);
        }
        max_balance
    }

    /// The ratio of the sum of node perimeters over the root perimeter, a
    /// measure of tree quality. 0 when the tree is empty.
    pub fn get_area_ratio(&self) -> f32 {
        let root = match self.root {
            Some(root) => root,
            None => return 0.0,
        };

        let root_area = self.nodes[root].aabb.get_perimeter();
        let mut total_area = 0.0;
        for node in &self.nodes {
            if node.height < 0 {
                // Free node in the pool.
                continue;
            }
            total_area += node.aabb.get_perimeter();
        }

        total_area / root_area
    }

    /// Total number of leaves inserted over the lifetime of the tree.
    pub fn get_insertion_count(&self) -> usize {
        self.insertion_count
    }

    fn parent_of(&self, index: usize) -> Option<usize> {
        match self.nodes[index].connection {
            TreeNodeConnection::Parent(parent) => Some(parent),
            _ => None,
        }
    }

    /// Take a node from the free list, growing the pool when it is exhausted.
    fn allocate_node(&mut self) -> usize {
        if self.free_list.is_none() {
            self.grow();
        }

        let index = self.free_list.unwrap();
        self.free_list = match self.nodes[index].connection {
            TreeNodeConnection::Next(next) => Some(next),
            _ => None,
        };

        let node = &mut self.nodes[index];
        node.connection = TreeNodeConnection::None;
        node.child1 = None;
        node.child2 = None;
        node.height = 0;
        node.user_data = None;
        self.node_count += 1;
        index
    }

    /// Return a node to the free list.
    fn free_node(&mut self, index: usize) {
        let connection = match self.free_list {
            Some(next) => TreeNodeConnection::Next(next),
            None => TreeNodeConnection::None,
        };

        let node = &mut self.nodes[index];
        node.connection = connection;
        node.child1 = None;
        node.child2 = None;
        node.height = -1;
        node.user_data = None;
        self.free_list = Some(index);
        self.node_count -= 1;
    }

    /// Double the node pool and chain the new nodes into the free list.
    fn grow(&mut self) {
        debug_assert!(self.free_list.is_none());

        let old_len = self.nodes.len();
        let new_len = (old_len * 2).max(16);
        self.nodes.reserve(new_len - old_len);
        for i in old_len..new_len {
            let connection = if i + 1 < new_len {
                TreeNodeConnection::Next(i + 1)
            } else {
                TreeNodeConnection::None
            };
            self.nodes.push(TreeNode {
                aabb: Aabb::default(),
                connection,
                child1: None,
                child2: None,
                height: -1,
                user_data: None,
            });
        }
        self.free_list = Some(old_len);
    }

    fn insert_leaf(&mut self, leaf: usize) {
        self.insertion_count += 1;

        if self.root.is_none() {
            self.root = Some(leaf);
            self.nodes[leaf].connection = TreeNodeConnection::None;
            return;
        }

        // Find the best sibling for this node.
        let leaf_aabb = self.nodes[leaf].aabb;
        let mut index = self.root.unwrap();
        while !self.nodes[index].is_leaf() {
            let child1 = self.nodes[index].child1.unwrap();
            let child2 = self.nodes[index].child2.unwrap();

            let area = self.nodes[index].aabb.get_perimeter();

            let combined_aabb = self.nodes[index].aabb.combine(&leaf_aabb);
            let combined_area = combined_aabb.get_perimeter();

            // Cost of creating a new parent for this node and the new leaf.
            let cost = 2.0 * combined_area;

            // Minimum cost of pushing the leaf further down the tree.
            let inheritance_cost = 2.0 * (combined_area - area);

            // Cost of descending into child1.
            let cost1 = {
                let aabb = self.nodes[child1].aabb.combine(&leaf_aabb);
                if self.nodes[child1].is_leaf() {
                    aabb.get_perimeter() + inheritance_cost
                } else {
                    let old_area = self.nodes[child1].aabb.get_perimeter();
                    let new_area = aabb.get_perimeter();
                    (new_area - old_area) + inheritance_cost
                }
            };

            // Cost of descending into child2.
            let cost2 = {
                let aabb = self.nodes[child2].aabb.combine(&leaf_aabb);
                if self.nodes[child2].is_leaf() {
                    aabb.get_perimeter() + inheritance_cost
                } else {
                    let old_area = self.nodes[child2].aabb.get_perimeter();
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
        let old_connection = self.nodes[sibling].connection;
        let new_parent = self.allocate_node();
        self.nodes[new_parent].connection = old_connection;
        self.nodes[new_parent].aabb =
            leaf_aabb.combine(&self.nodes[sibling].aabb);
        self.nodes[new_parent].height = self.nodes[sibling].height + 1;

        if let TreeNodeConnection::Parent(old_parent) = old_connection {
            // The sibling was not the root.
            if self.nodes[old_parent].child1 == Some(sibling) {
                self.nodes[old_parent].child1 = Some(new_parent);
            } else {
                self.nodes[old_parent].child2 = Some(new_parent);
            }
        } else {
            // The sibling was the root.
            self.root = Some(new_parent);
        }
        self.nodes[new_parent].child1 = Some(sibling);
        self.nodes[new_parent].child2 = Some(leaf);
        self.nodes[sibling].connection = TreeNodeConnection::Parent(new_parent);
        self.nodes[leaf].connection = TreeNodeConnection::Parent(new_parent);

        // Walk back up the tree fixing heights and AABBs.
        let mut index = self.parent_of(leaf);
        while let Some(i) = index {
            let i = self.balance(i);

            let child1 = self.nodes[i].child1.unwrap();
            let child2 = self.nodes[i].child2.unwrap();

            self.nodes[i].height = 1
                + self.nodes[child1].height.max(self.nodes[child2].height);
            self.nodes[i].aabb =
                self.nodes[child1].aabb.combine(&self.nodes[child2].aabb);

            index = self.parent_of(i);
        }
    }

    fn remove_leaf(&mut self, leaf: usize) {
        if self.root == Some(leaf) {
            self.root = None;
            return;
        }

        let parent = self.parent_of(leaf).unwrap();
        let grand_parent = self.parent_of(parent);
        let sibling = if self.nodes[parent].child1 == Some(leaf) {
            self.nodes[parent].child2.unwrap()
        } else {
            self.nodes[parent].child1.unwrap()
        };

        if let Some(grand_parent) = grand_parent {
            // Destroy the parent and connect the sibling to the grandparent.
            if self.nodes[grand_parent].child1 == Some(parent) {
                self.nodes[grand_parent].child1 = Some(sibling);
            } else {
                self.nodes[grand_parent].child2 = Some(sibling);
            }
            self.nodes[sibling].connection =
                TreeNodeConnection::Parent(grand_parent);
            self.free_node(parent);

            // Adjust the ancestor bounds.
            let mut index = Some(grand_parent);
            while let Some(i) = index {
                let i = self.balance(i);

                let child1 = self.nodes[i].child1.unwrap();
                let child2 = self.nodes[i].child2.unwrap();

                self.nodes[i].aabb =
                    self.nodes[child1].aabb.combine(&self.nodes[child2].aabb);
                self.nodes[i].height = 1
                    + self.nodes[child1].height.max(self.nodes[child2].height);

                index = self.parent_of(i);
            }
        } else {
            self.root = Some(sibling);
            self.nodes[sibling].connection = TreeNodeConnection::None;
            self.free_node(parent);
        }
    }

    // Perform a left or right rotation if node A is imbalanced.
    // Returns the new root index of the subtree.
    fn balance(&mut self, i_a: usize) -> usize {
        if self.nodes[i_a].is_leaf() || self.nodes[i_a].height < 2 {
            return i_a;
        }

        let i_b = self.nodes[i_a].child1.unwrap();
        let i_c = self.nodes[i_a].child2.unwrap();

        let balance = self.nodes[i_c].height - self.nodes[i_b].height;

        // Rotate C up
        if balance > 1 {
            let i_f = self.nodes[i_c].child1.unwrap();
            let i_g = self.nodes[i_c].child2.unwrap();

            // Swap A and C
            self.nodes[i_c].child1 = Some(i_a);
            self.nodes[i_c].connection = self.nodes[i_a].connection;
            self.nodes[i_a].connection = TreeNodeConnection::Parent(i_c);

            // A's old parent should point to C
            match self.nodes[i_c].connection {
                TreeNodeConnection::Parent(parent) => {
                    if self.nodes[parent].child1 == Some(i_a) {
                        self.nodes[parent].child1 = Some(i_c);
                    } else {
                        debug_assert!(
                            self.nodes[parent].child2 == Some(i_a)
                        );
                        self.nodes[parent].child2 = Some(i_c);
                    }
                }
                _ => self.root = Some(i_c),
            }

            // Rotate
            if self.nodes[i_f].height > self.nodes[i_g].height {
                self.nodes[i_c].child2 = Some(i_f);
                self.nodes[i_a].child2 = Some(i_g);
                self.nodes[i_g].connection = TreeNodeConnection::Parent(i_a);
                self.nodes[i_a].aabb =
                    self.nodes[i_b].aabb.combine(&self.nodes[i_g].aabb);
                self.nodes[i_c].aabb =
                    self.nodes[i_a].aabb.combine(&self.nodes[i_f].aabb);

                self.nodes[i_a].height =
                    1 + self.nodes[i_b].height.max(self.nodes[i_g].height);
                self.nodes[i_c].height =
                    1 + self.nodes[i_a].height.max(self.nodes[i_f].height);
            } else {
                self.nodes[i_c].child2 = Some(i_g);
                self.nodes[i_a].child2 = Some(i_f);
                self.nodes[i_f].connection = TreeNodeConnection::Parent(i_a);
                self.nodes[i_a].aabb =
                    self.nodes[i_b].aabb.combine(&self.nodes[i_f].aabb);
                self.nodes[i_c].aabb =
                    self.nodes[i_a].aabb.combine(&self.nodes[i_g].aabb);

                self.nodes[i_a].height =
                    1 + self.nodes[i_b].height.max(self.nodes[i_f].height);
                self.nodes[i_c].height =
                    1 + self.nodes[i_a].height.max(self.nodes[i_g].height);
            }

            return i_c;
        }

        // Rotate B up
        if balance < -1 {
            let i_d = self.nodes[i_b].child1.unwrap();
            let i_e = self.nodes[i_b].child2.unwrap();

            // Swap A and B
            self.nodes[i_b].child1 = Some(i_a);
            self.nodes[i_b].connection = self.nodes[i_a].connection;
            self.nodes[i_a].connection = TreeNodeConnection::Parent(i_b);

            // A's old parent should point to B
            match self.nodes[i_b].connection {
                TreeNodeConnection::Parent(parent) => {
                    if self.nodes[parent].child1 == Some(i_a) {
                        self.nodes[parent].child1 = Some(i_b);
                    } else {
                        debug_assert!(
                            self.nodes[parent].child2 == Some(i_a)
                        );
                        self.nodes[parent].child2 = Some(i_b);
                    }
                }
                _ => self.root = Some(i_b),
            }

            // Rotate
            if self.nodes[i_d].height > self.nodes[i_e].height {
                self.nodes[i_b].child2 = Some(i_d);
                self.nodes[i_a].child1 = Some(i_e);
                self.nodes[i_e].connection = TreeNodeConnection::Parent(i_a);
                self.nodes[i_a].aabb =
                    self.nodes[i_c].aabb.combine(&self.nodes[i_e].aabb);
                self.nodes[i_b].aabb =
                    self.nodes[i_a].aabb.combine(&self.nodes[i_d].aabb);

                self.nodes[i_a].height =
                    1 + self.nodes[i_c].height.max(self.nodes[i_e].height);
                self.nodes[i_b].height =
                    1 + self.nodes[i_a].height.max(self.nodes[i_d].height);
            } else {
                self.nodes[i_b].child2 = Some(i_e);
                self.nodes[i_a].child1 = Some(i_d);
                self.nodes[i_d].connection = TreeNodeConnection::Parent(i_a);
                self.nodes[i_a].aabb =
                    self.nodes[i_c].aabb.combine(&self.nodes[i_d].aabb);
                self.nodes[i_b].aabb =
                    self.nodes[i_a].aabb.combine(&self.nodes[i_e].aabb);

                self.nodes[i_a].height =
                    1 + self.nodes[i_c].height.max(self.nodes[i_d].height);
                self.nodes[i_b].height =
                    1 + self.nodes[i_a].height.max(self.nodes[i_e].height);
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
        while let Some(i) = free_index {
            assert!(i < self.nodes.len());
            assert_eq!(self.nodes[i].height, -1);
            free_index = match self.nodes[i].connection {
                TreeNodeConnection::Next(next) => Some(next),
                _ => None,
            };
            free_count += 1;
        }

        assert_eq!(self.get_height(), self.compute_height());
        assert_eq!(self.node_count + free_count, self.nodes.len());
    }

    /// Compute the height by walking the tree rather than trusting the node
    /// fields. For testing.
    #[cfg(any(test, debug_assertions))]
    pub fn compute_height(&self) -> i32 {
        match self.root {
            Some(root) => self.compute_sub_height(root),
            None => 0,
        }
    }

    #[cfg(any(test, debug_assertions))]
    fn compute_sub_height(&self, index: usize) -> i32 {
        let node = &self.nodes[index];
        if node.is_leaf() {
            return 0;
        }

        let height1 = self.compute_sub_height(node.child1.unwrap());
        let height2 = self.compute_sub_height(node.child2.unwrap());
        1 + height1.max(height2)
    }

    #[cfg(any(test, debug_assertions))]
    fn validate_structure(&self, index: Option<usize>) {
        let index = match index {
            Some(index) => index,
            None => return,
        };

        if Some(index) == self.root {
            assert!(matches!(
                self.nodes[index].connection,
                TreeNodeConnection::None
            ));
        }

        let node = &self.nodes[index];
        if node.is_leaf() {
            assert!(node.child2.is_none());
            assert_eq!(node.height, 0);
            assert!(node.user_data.is_some());
            return;
        }

        let child1 = node.child1.unwrap();
        let child2 = node.child2.unwrap();
        assert_eq!(self.parent_of(child1), Some(index));
        assert_eq!(self.parent_of(child2), Some(index));

        self.validate_structure(Some(child1));
        self.validate_structure(Some(child2));
    }

    #[cfg(any(test, debug_assertions))]
    fn validate_metrics(&self, index: Option<usize>) {
        let index = match index {
            Some(index) => index,
            None => return,
        };

        let node = &self.nodes[index];
        if node.is_leaf() {
            return;
        }

        let child1 = node.child1.unwrap();
        let child2 = node.child2.unwrap();

        let height1 = self.nodes[child1].height;
        let height2 = self.nodes[child2].height;
        assert_eq!(node.height, 1 + height1.max(height2));
        assert!((height2 - height1).abs() <= 1);

        let aabb = self.nodes[child1].aabb.combine(&self.nodes[child2].aabb);
        assert_eq!(node.aabb.lower_bound, aabb.lower_bound);
        assert_eq!(node.aabb.upper_bound, aabb.upper_bound);

        self.validate_metrics(Some(child1));
        self.validate_metrics(Some(child2));
    }
}

impl<T> BroadPhaseStrategy for DynamicTree<T> {
    type UserData = T;

    fn create_proxy(&mut self, aabb: &Aabb, user_data: T) -> usize {
        DynamicTree::create_proxy(self, aabb, user_data)
    }

    fn destroy_proxy(&mut self, proxy_id: usize) {
        DynamicTree::destroy_proxy(self, proxy_id);
    }

    fn move_proxy(
        &mut self,
        proxy_id: usize,
        aabb: &Aabb,
        displacement: Vec2,
    ) -> bool {
        DynamicTree::move_proxy(self, proxy_id, aabb, displacement)
    }

    fn get_fat_aabb(&self, proxy_id: usize) -> &Aabb {
        DynamicTree::get_fat_aabb(self, proxy_id)
    }

    fn get_user_data(&self, proxy_id: usize) -> &T {
        DynamicTree::get_user_data(self, proxy_id)
    }

    fn query<F>(&self, aabb: &Aabb, callback: F)
    where
        F: FnMut(usize) -> bool,
    {
        DynamicTree::query(self, aabb, callback);
    }

    fn ray_cast<F>(&self, input: &RayCastInput, callback: F)
    where
        F: FnMut(&RayCastInput, usize) -> f32,
    {
        DynamicTree::ray_cast(self, input, callback);
    }

    fn get_height(&self) -> i32 {
        DynamicTree::get_height(self)
    }

    fn get_max_balance(&self) -> i32 {
        DynamicTree::get_max_balance(self)
    }

    fn get_area_ratio(&self) -> f32 {
        DynamicTree::get_area_ratio(self)
    }
}
