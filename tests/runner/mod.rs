mod test_run_service;
