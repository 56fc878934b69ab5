mod shipper_tests;
