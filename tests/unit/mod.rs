mod concurrency_tests;
mod scenario_tests;
mod throughput_tests;
