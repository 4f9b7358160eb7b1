// Behavior of the topology editor as seen through its public API.
use qkd_network_canvas::{ChannelField, NetworkEditor, NodeField, NodeHandle, Protocol, Selection};

fn handles(editor: &NetworkEditor) -> Vec<NodeHandle> {
	editor.store().nodes().iter().map(|n| n.handle).collect()
}

#[test]
fn test_seed_connect_add_remove_scenario() {
	let mut editor = NetworkEditor::new(Protocol::Dps);
	let seeds = handles(&editor);
	let payload = editor.payload();
	assert_eq!(payload.nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 2]);

	editor.connect(seeds[0], seeds[1]).unwrap();
	let payload = editor.payload();
	assert_eq!(payload.channels.len(), 1);
	let ch = &payload.channels[0];
	assert_eq!((ch.id, ch.from, ch.to), (1, 1, 2));

	let third = editor.add_node();
	let payload = editor.payload();
	assert_eq!(payload.nodes.len(), 3);
	assert_eq!(payload.channels.len(), 1);

	editor.remove_node(seeds[1]);
	let payload = editor.payload();
	assert!(payload.channels.is_empty());
	assert_eq!(payload.nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 2]);
	assert_eq!(handles(&editor), vec![seeds[0], third]);
}

#[test]
fn test_cow_bit_flip_scenario() {
	let mut editor = NetworkEditor::new(Protocol::Cow);
	let seeds = handles(&editor);
	let edge = editor.connect(seeds[0], seeds[1]).unwrap();
	assert_eq!(
		editor.store().edge(edge).unwrap().params.stored_bit_flip_error_prob(),
		Some(0.05)
	);
	assert_eq!(editor.payload().channels[0].bit_flip_error_prob, Some(0.05));

	editor.select_edge(edge);
	editor.edit_edge(ChannelField::BitFlipErrorProb, "0.2").unwrap();
	assert_eq!(editor.payload().channels[0].bit_flip_error_prob, Some(0.2));

	editor.set_protocol(Protocol::Dps);
	let json = serde_json::to_value(editor.payload()).unwrap();
	assert!(json["channels"][0].get("bit_flip_error_prob").is_none());
	assert_eq!(
		editor.store().edge(edge).unwrap().params.stored_bit_flip_error_prob(),
		Some(0.2)
	);
}

#[test]
fn test_channels_created_before_cow_project_the_default() {
	let mut editor = NetworkEditor::new(Protocol::Bb84);
	let seeds = handles(&editor);
	editor.connect(seeds[0], seeds[1]).unwrap();
	editor.connect(seeds[1], seeds[0]).unwrap();
	assert!(editor.payload().channels.iter().all(|c| c.bit_flip_error_prob.is_none()));

	editor.set_protocol(Protocol::Cow);
	assert!(
		editor
			.payload()
			.channels
			.iter()
			.all(|c| c.bit_flip_error_prob == Some(0.05))
	);
}

#[test]
fn test_cascade_leaves_no_dangling_channels() {
	let mut editor = NetworkEditor::new(Protocol::Dps);
	let mut nodes = handles(&editor);
	nodes.push(editor.add_node());
	nodes.push(editor.add_node());
	for &a in &nodes {
		for &b in &nodes {
			editor.connect(a, b);
		}
	}

	for &victim in &nodes[..3] {
		editor.remove_node(victim);
		assert!(
			editor
				.store()
				.edges()
				.iter()
				.all(|e| e.source != victim && e.target != victim)
		);
	}
	let survivor = nodes[3];
	assert_eq!(editor.store().edges().len(), 1);
	let payload = editor.payload();
	assert_eq!((payload.channels[0].from, payload.channels[0].to), (1, 1));
	assert_eq!(handles(&editor), vec![survivor]);
}

#[test]
fn test_undo_restores_each_step_exactly() {
	let mut editor = NetworkEditor::new(Protocol::Cow);
	let seeds = handles(&editor);
	let mut states = vec![editor.store().clone()];

	let c = editor.add_node();
	states.push(editor.store().clone());
	let edge = editor.connect(seeds[0], c).unwrap();
	states.push(editor.store().clone());
	editor.select_node(seeds[1]);
	editor.edit_node(NodeField::DetectorEfficiency, "0.75").unwrap();
	states.push(editor.store().clone());
	editor.select_edge(edge);
	editor.edit_edge(ChannelField::FiberType, "photonic_crystal").unwrap();
	states.push(editor.store().clone());
	editor.connect(c, c).unwrap();
	states.push(editor.store().clone());
	editor.remove_edge(edge);
	states.push(editor.store().clone());
	editor.remove_node(seeds[0]);

	while let Some(expected) = states.pop() {
		editor.select_node(c);
		assert!(editor.undo());
		assert_eq!(editor.store(), &expected);
		assert_eq!(editor.selection(), Selection::None);
	}
	assert!(!editor.can_undo());
}

#[test]
fn test_self_loop_channel_projects_to_its_own_node() {
	let mut editor = NetworkEditor::new(Protocol::Dps);
	let seeds = handles(&editor);
	editor.connect(seeds[1], seeds[1]).unwrap();
	let payload = editor.payload();
	assert_eq!(payload.channels.len(), 1);
	assert_eq!((payload.channels[0].from, payload.channels[0].to), (2, 2));

	editor.remove_node(seeds[0]);
	let payload = editor.payload();
	assert_eq!((payload.channels[0].from, payload.channels[0].to), (1, 1));

	editor.undo();
	let payload = editor.payload();
	assert_eq!((payload.channels[0].from, payload.channels[0].to), (2, 2));
}

#[test]
fn test_undo_with_empty_history_is_a_no_op() {
	let mut editor = NetworkEditor::new(Protocol::Dps);
	let before = editor.store().clone();
	assert!(!editor.undo());
	assert!(!editor.undo());
	assert_eq!(editor.store(), &before);
	assert_eq!(editor.selection(), Selection::None);
}

#[test]
fn test_projection_is_repeatable() {
	let mut editor = NetworkEditor::new(Protocol::Cow);
	let seeds = handles(&editor);
	editor.add_node();
	editor.connect(seeds[1], seeds[0]);
	assert_eq!(editor.payload(), editor.payload());
}

#[test]
fn test_edit_on_removed_selection_is_ignored() {
	let mut editor = NetworkEditor::new(Protocol::Dps);
	let seeds = handles(&editor);
	let edge = editor.connect(seeds[0], seeds[1]).unwrap();
	editor.select_edge(edge);
	editor.remove_node(seeds[0]);
	let steps = editor.history_len();

	assert!(editor.edit_edge(ChannelField::FiberLengthKm, "40").is_ok());
	assert_eq!(editor.history_len(), steps);
}

#[test]
fn test_rejected_node_input_keeps_the_previous_value() {
	let mut editor = NetworkEditor::new(Protocol::Dps);
	let seeds = handles(&editor);
	editor.select_node(seeds[0]);
	assert!(editor.edit_node(NodeField::NumPulses, "").is_err());
	assert!(editor.edit_node(NodeField::Mu, "-1").is_err());
	let node = editor.store().node(seeds[0]).unwrap();
	assert_eq!((node.params.num_pulses, node.params.mu), (10_000, 0.2));
	assert!(!editor.can_undo());
}
