use intrusive_rbtree::{Color, KeyFirstNode, Linked, Links, RBNode, RBTree, Verify};
use std::ptr;

fn nodes(keys: &[i32]) -> Vec<RBNode<i32>> {
    keys.iter().map(|&k| RBNode::new(k, ())).collect()
}

fn keys<T: Linked<Key = i32>, C, M>(tree: &RBTree<'_, T, C, M>) -> Vec<i32> {
    tree.iter().map(|node| *node.key()).collect()
}

#[test]
fn three_ascending() {
    let nodes = nodes(&[10, 20, 30]);
    let mut tree = RBTree::new();
    for node in &nodes {
        tree.insert(node);
    }

    let root = tree.root().unwrap();
    assert_eq!(*root.key(), 20);
    assert_eq!(root.links().color(), Color::Black);
    for node in [&nodes[0], &nodes[2]].iter() {
        assert_eq!(node.links().color(), Color::Red);
        assert_eq!(node.links().parent(), Some(ptr::NonNull::from(root)));
    }
    assert_eq!(
        tree.verify(),
        Ok(Verify {
            black_height: 1,
            min_depth:    2,
            max_depth:    2,
        })
    );
}

#[test]
fn remove_inner_node() {
    let nodes = nodes(&[10, 20, 30, 40, 50, 60, 70]);
    let mut tree = RBTree::new();
    for node in &nodes {
        tree.insert(node);
    }
    tree.verify().unwrap();

    let removed = tree.remove_key(&20).unwrap();
    assert!(ptr::eq(removed, &nodes[1]));
    assert!(!nodes[1].is_linked());
    assert!(tree.height() <= 4);
    assert_eq!(tree.verify().unwrap().max_depth, tree.height());
    assert_eq!(keys(&tree), [10, 30, 40, 50, 60, 70]);
    assert!(!tree.contains_key(&20));
    assert_eq!(tree.search(&20).map(|n| *n.key()), None);
}

#[test]
fn empty() {
    let tree = RBTree::<RBNode<i32>>::new();
    assert!(tree.is_empty());
    assert!(tree.root().is_none());
    assert!(tree.first().is_none());
    assert!(tree.last().is_none());
    assert!(tree.search(&1).is_none());
    assert_eq!(tree.count(), 0);
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.verify(), Ok(Verify::default()));
    assert!(tree.iter().next().is_none());
}

#[test]
fn last_node_out_empties() {
    let node = RBNode::new(1, ());
    let mut tree = RBTree::new();
    tree.insert(&node);
    assert!(!tree.is_empty());
    assert!(node.is_linked());
    assert!(node.links().is_black());
    assert!(ptr::eq(unsafe { tree.remove(&node) }, &node));
    assert!(tree.is_empty());
    assert!(!node.is_linked());
}

#[test]
fn height_bound() {
    let nodes: Vec<_> = (0..1000).map(|k| RBNode::new(k, ())).collect();
    let mut tree = RBTree::new();
    for (n, node) in nodes.iter().enumerate() {
        tree.insert(node);
        let bound = 2.0 * ((n + 2) as f64).log2();
        assert!(tree.height() as f64 <= bound, "n={} h={}", n + 1, tree.height());
    }
    assert_eq!(tree.count(), 1000);
    tree.verify().unwrap();
}

#[test]
fn try_insert() {
    let first = RBNode::new(3, "first");
    let second = RBNode::new(3, "second");
    let mut tree = RBTree::new();

    assert!(ptr::eq(tree.try_insert(&first).unwrap(), &first));
    let resident = tree.try_insert(&second).unwrap_err();
    assert!(ptr::eq(resident, &first));
    assert!(!second.is_linked());
    assert_eq!(tree.search(&3).map(|n| *n.value()), Some("first"));
    assert_eq!(tree.count(), 1);
}

#[test]
fn pop_both_ends() {
    let nodes = nodes(&[5, 1, 4, 2, 3]);
    let mut tree = RBTree::new();
    for node in &nodes {
        tree.insert(node);
    }
    assert_eq!(tree.pop_first().map(|n| *n.key()), Some(1));
    assert_eq!(tree.pop_last().map(|n| *n.key()), Some(5));
    tree.verify().unwrap();
    assert_eq!(keys(&tree), [2, 3, 4]);
    assert_eq!(tree.pop_first().map(|n| *n.key()), Some(2));
    assert_eq!(tree.pop_first().map(|n| *n.key()), Some(3));
    assert_eq!(tree.pop_last().map(|n| *n.key()), Some(4));
    assert!(tree.pop_first().is_none());
    assert!(tree.pop_last().is_none());
    assert!(nodes.iter().all(|node| !node.is_linked()));
}

#[test]
fn iterate_both_ways() {
    let nodes: Vec<_> = (0..50).rev().map(|k| RBNode::new(k, ())).collect();
    let mut tree = RBTree::new();
    for node in &nodes {
        tree.insert(node);
    }

    assert_eq!(keys(&tree), (0..50).collect::<Vec<_>>());
    let back: Vec<_> = tree.iter().rev().map(|n| *n.key()).collect();
    assert_eq!(back, (0..50).rev().collect::<Vec<_>>());

    let mut iter = tree.iter();
    assert_eq!(iter.next().map(|n| *n.key()), Some(0));
    assert_eq!(iter.next_back().map(|n| *n.key()), Some(49));
    let middle: Vec<_> = iter.clone().map(|n| *n.key()).collect();
    assert_eq!(middle, (1..49).collect::<Vec<_>>());
    assert_eq!(iter.count(), 48);

    let mut iter = tree.iter();
    for _ in 0..25 {
        iter.next();
        iter.next_back();
    }
    assert!(iter.next().is_none());
    assert!(iter.next_back().is_none());

    let mut count = 0;
    for node in &tree {
        assert_eq!(*node.key(), count);
        count += 1;
    }
    assert_eq!(count, 50);
}

#[test]
fn neighbours() {
    let nodes = nodes(&[1, 2, 3]);
    let mut tree = RBTree::new();
    for node in &nodes {
        tree.insert(node);
    }
    unsafe {
        assert!(ptr::eq(tree.next(&nodes[0]).unwrap(), &nodes[1]));
        assert!(ptr::eq(tree.next(&nodes[1]).unwrap(), &nodes[2]));
        assert!(tree.next(&nodes[2]).is_none());
        assert!(ptr::eq(tree.prev(&nodes[2]).unwrap(), &nodes[1]));
        assert!(tree.prev(&nodes[0]).is_none());
    }
}

#[test]
fn clear_and_reuse() {
    let nodes = nodes(&[4, 8, 15, 16, 23, 42]);
    let mut first = RBTree::new();
    for node in &nodes {
        first.insert(node);
    }
    first.clear();
    assert!(first.is_empty());
    assert!(nodes.iter().all(|node| !node.is_linked()));

    let mut second = RBTree::new();
    for node in nodes.iter().rev() {
        second.insert(node);
    }
    second.verify().unwrap();
    assert_eq!(keys(&second), [4, 8, 15, 16, 23, 42]);
}

#[test]
fn drop_unlinks() {
    let nodes = nodes(&[3, 1, 2]);
    {
        let mut tree = RBTree::new();
        for node in &nodes {
            tree.insert(node);
        }
        assert!(nodes.iter().all(|node| node.is_linked()));
    }
    assert!(nodes.iter().all(|node| !node.is_linked()));
}

#[test]
fn debug_lists_keys() {
    let nodes = nodes(&[2, 3, 1]);
    let mut tree = RBTree::new();
    for node in &nodes {
        tree.insert(node);
    }
    assert_eq!(format!("{:?}", tree), "{1, 2, 3}");
    assert_eq!(
        format!("{:?}", nodes[0]),
        "RBNode { key: 2, value: (), linked: true }"
    );
}

#[test]
fn key_first_nodes() {
    let nodes: Vec<_> = ["pear", "apple", "fig"]
        .iter()
        .map(|&name| KeyFirstNode::new(name, name.len()))
        .collect();
    let mut tree = RBTree::new();
    for node in &nodes {
        tree.insert(node);
    }
    let fruit: Vec<_> = tree.iter().map(|n| *n.key()).collect();
    assert_eq!(fruit, ["apple", "fig", "pear"]);
    assert_eq!(tree.search(&"fig").map(|n| *n.value()), Some(3));
    tree.verify().unwrap();
}

struct Task {
    name:     &'static str,
    links:    Links<Task>,
    priority: u32,
}

unsafe impl Linked for Task {
    type Key = u32;

    fn links(&self) -> &Links<Task> {
        &self.links
    }

    fn key(&self) -> &u32 {
        &self.priority
    }
}

#[test]
fn custom_record() {
    let tasks: Vec<_> = [("write", 2), ("review", 1), ("ship", 3)]
        .iter()
        .map(|&(name, priority)| Task {
            name,
            links: Links::new(),
            priority,
        })
        .collect();
    let mut queue = RBTree::new();
    for task in &tasks {
        queue.insert(task);
    }
    let order: Vec<_> = std::iter::from_fn(|| queue.pop_first().map(|t| t.name)).collect();
    assert_eq!(order, ["review", "write", "ship"]);
    assert!(tasks.iter().all(|task| !task.links.is_linked()));
}

#[test]
fn closure_order() {
    let nodes = nodes(&[-3, 1, -2, 4]);
    let mut tree: RBTree<'_, _, _> = RBTree::with_compare(|a: &i32, b: &i32| a.abs() < b.abs());
    for node in &nodes {
        tree.insert(node);
    }
    assert_eq!(keys(&tree), [1, -2, -3, 4]);
    assert_eq!(tree.search(&3).map(|n| *n.key()), Some(-3));
    assert_eq!(tree.search(&-4).map(|n| *n.key()), Some(4));
    assert!(!tree.contains_key(&5));
    tree.verify().unwrap();
}

#[test]
#[should_panic(expected = "node is not linked into a tree")]
fn remove_unlinked() {
    let nodes = nodes(&[1, 2]);
    let stray = RBNode::new(3, ());
    let mut tree = RBTree::new();
    for node in &nodes {
        tree.insert(node);
    }
    unsafe {
        tree.remove(&stray);
    }
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "node is linked into a different tree")]
fn remove_from_wrong_tree() {
    let a = RBNode::new(1, ());
    let b = RBNode::new(2, ());
    let mut first = RBTree::new();
    let mut second = RBTree::new();
    first.insert(&a);
    second.insert(&b);
    unsafe {
        first.remove(&b);
    }
}

#[test]
#[should_panic(expected = "node is already linked into a tree")]
fn insert_linked_elsewhere() {
    let node = RBNode::new(1, ());
    let mut first = RBTree::new();
    let mut second = RBTree::new();
    first.insert(&node);
    second.insert(&node);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "inserted a key that is already present")]
fn unique_rejects_equal_key() {
    let nodes = nodes(&[7, 7]);
    let mut tree = RBTree::new();
    for node in &nodes {
        tree.insert(node);
    }
}
