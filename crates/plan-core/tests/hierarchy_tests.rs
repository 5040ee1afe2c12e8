use std::cell::Cell;

use resource_plan::{
    BusinessUnit, ChildLoader, Department, Hierarchy, NodeKind, PlanResult, ProductLine, SubTeam,
    TreeNode, build_tree, filter_tree,
};

fn units() -> Vec<BusinessUnit> {
    vec![
        BusinessUnit {
            id: 1,
            name: "VSS".into(),
            code: Some("BU-VSS".into()),
        },
        BusinessUnit {
            id: 2,
            name: "Automotive".into(),
            code: None,
        },
    ]
}

fn lines() -> Vec<ProductLine> {
    vec![
        ProductLine {
            id: 10,
            business_unit_id: 1,
            name: "Cameras".into(),
            code: None,
        },
        ProductLine {
            id: 11,
            business_unit_id: 1,
            name: "Analytics".into(),
            code: Some("AN".into()),
        },
        ProductLine {
            id: 20,
            business_unit_id: 2,
            name: "Infotainment".into(),
            code: None,
        },
        ProductLine {
            id: 99,
            business_unit_id: 42,
            name: "Orphan".into(),
            code: None,
        },
    ]
}

fn node(kind: NodeKind, id: i64, name: &str) -> TreeNode {
    TreeNode {
        kind,
        id,
        name: name.into(),
        code: None,
        children: Vec::new(),
        loaded: true,
    }
}

struct CountingLoader {
    calls: Cell<usize>,
}

impl ChildLoader for CountingLoader {
    fn load_children(&self, parent: &TreeNode) -> PlanResult<Vec<TreeNode>> {
        self.calls.set(self.calls.get() + 1);
        Ok(vec![
            node(NodeKind::Project, parent.id * 100 + 1, "Doorbell"),
            node(NodeKind::Project, parent.id * 100 + 2, "Bodycam"),
        ])
    }
}

fn names(nodes: &[TreeNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}

#[test]
fn builds_sorted_two_level_tree() {
    let tree = build_tree(&units(), &lines(), false);
    assert_eq!(names(&tree), vec!["Automotive", "VSS"]);
    let vss = &tree[1];
    assert_eq!(names(&vss.children), vec!["Analytics", "Cameras"]);
    assert!(vss.loaded);
    assert!(vss.children.iter().all(|c| !c.loaded));
}

#[test]
fn orphans_and_duplicates_are_dropped() {
    let mut lines = lines();
    lines.push(lines[0].clone());
    let tree = build_tree(&units(), &lines, false);
    let total: usize = tree.iter().map(|n| n.children.len()).sum();
    assert_eq!(total, 3);
}

#[test]
fn filter_keeps_ancestors_of_matches() {
    let tree = build_tree(&units(), &lines(), false);
    let filtered = filter_tree(&tree, "camera");
    assert_eq!(names(&filtered), vec!["VSS"]);
    assert_eq!(names(&filtered[0].children), vec!["Cameras"]);
}

#[test]
fn matching_parent_keeps_all_children() {
    let tree = build_tree(&units(), &lines(), false);
    let filtered = filter_tree(&tree, "vss");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].children.len(), 2);
}

#[test]
fn filter_matches_codes_case_insensitively() {
    let tree = build_tree(&units(), &lines(), false);
    let filtered = filter_tree(&tree, "AN");
    assert_eq!(names(&filtered), vec!["VSS"]);
    assert_eq!(names(&filtered[0].children), vec!["Analytics"]);

    let mixed = filter_tree(&tree, "MENT");
    assert_eq!(names(&mixed), vec!["Automotive"]);

    let by_code = filter_tree(&tree, "BU-vss");
    assert_eq!(names(&by_code), vec!["VSS"]);
}

#[test]
fn filter_is_idempotent_and_blank_is_identity() {
    let tree = build_tree(&units(), &lines(), false);
    assert_eq!(filter_tree(&tree, "   "), tree);
    let once = filter_tree(&tree, "info");
    let twice = filter_tree(&once, "info");
    assert_eq!(once, twice);
    assert!(filter_tree(&tree, "nothing like this").is_empty());
}

#[test]
fn expanding_loads_children_once() {
    let mut hierarchy = Hierarchy::projects(&units(), &lines());
    let loader = CountingLoader {
        calls: Cell::new(0),
    };

    hierarchy.expand(NodeKind::ProductLine, 10, &loader).unwrap();
    hierarchy.collapse(NodeKind::ProductLine, 10);
    hierarchy.expand(NodeKind::ProductLine, 10, &loader).unwrap();
    assert_eq!(loader.calls.get(), 1);

    let cameras = hierarchy.find(NodeKind::ProductLine, 10).unwrap();
    assert!(cameras.loaded);
    assert_eq!(names(&cameras.children), vec!["Bodycam", "Doorbell"]);
}

#[test]
fn attach_skips_ids_already_in_tree() {
    let mut hierarchy = Hierarchy::projects(&units(), &lines());
    hierarchy
        .attach_children(
            NodeKind::ProductLine,
            10,
            vec![node(NodeKind::Project, 500, "Doorbell")],
        )
        .unwrap();
    hierarchy
        .attach_children(
            NodeKind::ProductLine,
            11,
            vec![
                node(NodeKind::Project, 500, "Doorbell"),
                node(NodeKind::Project, 501, "Insights"),
            ],
        )
        .unwrap();
    let analytics = hierarchy.find(NodeKind::ProductLine, 11).unwrap();
    assert_eq!(names(&analytics.children), vec!["Insights"]);

    let missing = hierarchy.attach_children(NodeKind::ProductLine, 404, Vec::new());
    assert!(missing.is_err());
}

#[test]
fn visible_rows_follow_expansion_and_search() {
    let mut hierarchy = Hierarchy::projects(&units(), &lines());
    let collapsed = hierarchy.visible_rows("");
    assert_eq!(collapsed.len(), 2);
    assert!(collapsed.iter().all(|r| r.depth == 0));

    let loader = CountingLoader {
        calls: Cell::new(0),
    };
    hierarchy.expand(NodeKind::BusinessUnit, 1, &loader).unwrap();
    assert_eq!(loader.calls.get(), 0);
    let rows = hierarchy.visible_rows("");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[2].name, "Analytics");
    assert_eq!(rows[2].depth, 1);

    let searched = hierarchy.visible_rows("info");
    let searched_names: Vec<&str> = searched.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(searched_names, vec!["Automotive", "Infotainment"]);
}

#[test]
fn organization_tree_from_departments() {
    let departments = vec![Department {
        id: 1,
        name: "Engineering".into(),
        code: None,
    }];
    let teams = vec![
        SubTeam {
            id: 5,
            department_id: 1,
            name: "Platform".into(),
            code: None,
        },
        SubTeam {
            id: 6,
            department_id: 1,
            name: "Firmware".into(),
            code: None,
        },
    ];
    let hierarchy = Hierarchy::organization(&departments, &teams);
    assert_eq!(names(&hierarchy.roots()[0].children), vec!["Firmware", "Platform"]);
    assert_eq!(hierarchy.roots()[0].children[0].kind, NodeKind::SubTeam);
}
