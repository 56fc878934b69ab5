mod evaluator_tests;
