mod recorder;
mod sequencer_metrics_tests;
