mod bind_address_tests;
