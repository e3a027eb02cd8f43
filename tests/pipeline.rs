use speaker_graph::graph::{NEUTRAL_COLOR, POSITIVE_COLOR};
use speaker_graph::session::parse_analysis_batch;
use speaker_graph::settings::{FocusSettings, SimulationSettings};
use speaker_graph::{
    AnalysisConfig, EngineSettings, Interaction, LayoutEvent, LayoutOrchestrator, Sentiment,
    Speaker, StrengthMetrics, Viewport, build_graph, force_layout, select_focus,
};

fn speakers(ids: &[&str]) -> Vec<Speaker> {
    ids.iter().map(|id| Speaker::new(*id, *id)).collect()
}

fn frequency_and_sentiment() -> AnalysisConfig {
    AnalysisConfig::with_metrics(StrengthMetrics {
        frequency: true,
        sentiment: true,
        ..StrengthMetrics::NONE
    })
}

#[test]
fn three_speaker_pipeline() {
    let speakers = speakers(&["A", "B", "C"]);
    let interactions = vec![
        Interaction::new("A", "B")
            .with_count(3)
            .with_sentiment(Sentiment::Positive),
        Interaction::new("B", "C")
            .with_count(1)
            .with_sentiment(Sentiment::Neutral),
    ];
    let config = frequency_and_sentiment();

    let graph = build_graph(&speakers, &interactions, &config);
    assert_eq!(graph.edges[0].style.thickness, 3.0);
    assert_eq!(graph.edges[0].style.color, POSITIVE_COLOR);
    assert_eq!(graph.edges[1].style.thickness, 2.0);
    assert_eq!(graph.edges[1].style.color, NEUTRAL_COLOR);
    assert_eq!(graph.edges[0].style.label, "3 interactions");

    let run = force_layout(
        &graph.nodes,
        &graph.edges,
        Viewport::default(),
        &SimulationSettings::default(),
    );
    let degrees = run
        .nodes
        .iter()
        .map(|node| node.weighted_degree)
        .collect::<Vec<_>>();
    assert_eq!(degrees, vec![3.0, 4.0, 1.0]);

    let focus = select_focus(&run.nodes, &graph.edges, &FocusSettings::default());
    assert_eq!(focus.focus_node_id.as_deref(), Some("B"));
    let camera = focus.camera.unwrap();
    assert_eq!(camera.zoom, 1.5);

    let b = &run.nodes[1];
    assert_eq!(camera.center, b.position + FocusSettings::default().offset);
}

#[test]
fn lone_speaker_is_centered_after_layout() {
    let mut orchestrator = LayoutOrchestrator::default();
    let frame = orchestrator
        .ingest_batch(speakers(&["solo"]), Vec::new())
        .unwrap();

    assert_eq!(frame.nodes.len(), 1);
    assert!(frame.edges.is_empty());
    assert_eq!(frame.focus_node_id.as_deref(), Some("solo"));

    let camera = frame.camera.unwrap();
    assert_eq!(camera.zoom, 1.5);
    assert!((camera.center.x - 550.0).abs() < 1e-3);
    assert!((camera.center.y - 350.0).abs() < 1e-3);
}

#[test]
fn empty_session_produces_no_camera() {
    let mut orchestrator = LayoutOrchestrator::default();
    let frame = orchestrator.ingest_batch(Vec::new(), Vec::new()).unwrap();
    assert_eq!(frame.camera, None);
    assert_eq!(frame.focus_node_id, None);
    assert_eq!(
        frame.events,
        vec![LayoutEvent::LayoutReady {
            generation: frame.generation
        }]
    );
}

#[test]
fn frame_serializes_renderer_contract() {
    let batch = parse_analysis_batch(
        r#"{
            "speakers": [
                {"id": "a", "displayName": "Ada", "twitterHandle": "@ada"},
                {"id": "b", "displayName": "Bo"}
            ],
            "analysis": {
                "interactions": [
                    {"fromSpeakerId": "a", "toSpeakerId": "b", "count": 2, "sentiment": "Positive"},
                    {"fromSpeakerId": "a", "toSpeakerId": "nobody"}
                ],
                "summary": "two people talked"
            }
        }"#,
    )
    .unwrap();

    let mut orchestrator = LayoutOrchestrator::new(AnalysisConfig::default(), EngineSettings::default());
    let frame = orchestrator
        .ingest_batch(batch.speakers, batch.interactions)
        .unwrap();
    let json = serde_json::to_value(&frame).unwrap();

    assert_eq!(json["droppedInteractions"], 1);
    assert_eq!(json["nodes"][0]["data"]["label"], "Ada");
    assert_eq!(json["nodes"][0]["data"]["twitterHandle"], "@ada");
    assert_eq!(json["edges"][0]["id"], "a->b#0");
    assert_eq!(json["edges"][0]["style"]["stroke"], POSITIVE_COLOR);
    assert_eq!(json["edges"][0]["style"]["strokeWidth"], 2.0);
    assert_eq!(json["camera"]["durationMs"], 800);
    assert_eq!(json["events"][0]["type"], "layoutReady");
    assert!(json["camera"]["center"]["x"].is_number());
}
